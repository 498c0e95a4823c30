pub mod capture;
pub mod orchestrator;
pub mod runner;
pub mod session;
pub mod speaker;
pub mod traits;

pub use orchestrator::{Orchestrator, OrchestratorConfig, StatusView};
pub use session::{ConsultationState, ConsultationStatus};
pub use speaker::{SpeakOutcome, SpeakerChain};
pub use traits::{InsightBackend, SpeechBackend, SpeechInput};
