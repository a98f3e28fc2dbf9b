use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    domain::{
        drill::{
            artifact_name, ArtifactQuery, DrillRender, DrillService, DrillServiceApi,
            RenderDrillRequest, RenderRequest,
        },
        storage::{validate_ttl, SignedUrl},
        tts::VoiceConfig,
    },
    error::{AppError, AppResult},
};

/// Default synthesis parameters applied to every request
#[derive(Debug, Clone)]
pub struct VoiceDefaults {
    pub language: String,
    pub speaking_rate: f32,
    pub volume_gain_db: f32,
}

impl VoiceDefaults {
    fn voice_for(&self, language: Option<&str>) -> VoiceConfig {
        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.language);
        VoiceConfig::for_language(language)
            .with_speaking_rate(self.speaking_rate)
            .with_volume_gain_db(self.volume_gain_db)
    }
}

pub struct DrillController {
    drill_service: Arc<DrillService>,
    voice_defaults: VoiceDefaults,
}

impl DrillController {
    pub fn new(drill_service: Arc<DrillService>, voice_defaults: VoiceDefaults) -> Self {
        Self {
            drill_service,
            voice_defaults,
        }
    }

    /// POST /api/drills - Render a drill track from sentence pairs
    pub async fn render(
        State(controller): State<Arc<DrillController>>,
        Json(request): Json<RenderDrillRequest>,
    ) -> AppResult<(StatusCode, Json<DrillRender>)> {
        let pairs = request.sentence_pairs()?;
        if pairs.is_empty() {
            return Err(AppError::BadRequest(
                "Provide 'pairs' or 'text' with at least one sentence and translation".to_string(),
            ));
        }

        let render = controller
            .drill_service
            .render(RenderRequest {
                pairs,
                voice: controller.voice_defaults.voice_for(request.language.as_deref()),
                logical_name: artifact_name(request.title.as_deref(), Utc::now()),
            })
            .await?;

        Ok((StatusCode::CREATED, Json(render)))
    }

    /// GET /api/drills/url?key=..&ttl=.. - Time-limited URL for an artifact
    pub async fn signed_url(
        State(controller): State<Arc<DrillController>>,
        Query(query): Query<ArtifactQuery>,
    ) -> AppResult<Json<SignedUrl>> {
        let ttl = query
            .ttl
            .map(|secs| validate_ttl(Duration::from_secs(secs)))
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let signed = controller
            .drill_service
            .resolve_url(&query.key, ttl)
            .await?;

        Ok(Json(signed))
    }

    /// DELETE /api/drills?key=.. - Remove an artifact; missing keys succeed
    pub async fn discard(
        State(controller): State<Arc<DrillController>>,
        Query(query): Query<ArtifactQuery>,
    ) -> AppResult<StatusCode> {
        controller.drill_service.discard(&query.key).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
