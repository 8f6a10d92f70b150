pub mod session;

pub use session::{RecordedSession, RecordedTrial, replay};
