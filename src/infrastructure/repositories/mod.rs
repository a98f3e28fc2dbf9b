pub mod google_tts_repository;
pub mod local_storage_repository;
pub mod polly_tts_repository;
pub mod presigned_url_signer;
pub mod s3_storage_repository;
pub mod storage_repository;
pub mod supabase_url_signer;
pub mod tts_repository;
pub mod url_signer;

pub use google_tts_repository::GoogleTtsRepository;
pub use local_storage_repository::LocalStorageRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use presigned_url_signer::S3PresignUrlSigner;
pub use s3_storage_repository::S3StorageRepository;
pub use storage_repository::StorageRepository;
pub use supabase_url_signer::SupabaseUrlSigner;
pub use tts_repository::TtsRepository;
pub use url_signer::UrlSigner;
