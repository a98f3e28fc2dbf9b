// End-to-end tests for the DrillTape Backend API
//
// Each test boots the real router on an ephemeral port. The TTS provider is
// a scripted in-process repository that speaks a short tone for every
// sentence, and artifacts land in a temp-dir backed local storage that is
// removed when the test context is dropped.

mod helpers;
mod test_drills;
mod test_health;
