pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod recorder;
pub mod summary;

pub use config::RecorderConfig;
pub use error::{ExportError, RecorderError};
pub use export::SessionExport;
pub use layout::TargetLayout;
pub use recorder::{SampleInput, TrialRecorder};
pub use summary::SessionSummary;
