pub mod data_log;
pub mod dto;
pub mod geometry;
pub mod trial;

pub use data_log::DataLog;
pub use dto::{DataLogDto, TestTrialDto};
pub use geometry::{Quat, Vec2, Vec3};
pub use trial::TestTrial;
