use crate::data_log::DataLog;
use serde::{Deserialize, Serialize};

/// Flat per-trial record, one row per trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestTrialDto {
    pub trial_number: u32,
    pub start_time: f32,
    pub target_angle: f32,
    pub time_to_first_entry: Option<f32>,
    pub time_to_activation: f32,
    pub center_error_x: f32,
    pub center_error_y: f32,
    pub cursor_movement: f32,
    pub head_movement: f32,
    pub effective_amplitude: f32,
    pub timed_out: bool,
    pub error: bool,
    pub log_count: usize,
}

/// Flat per-sample record, keyed by trial number and sample index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLogDto {
    pub trial_number: u32,
    pub sample_index: usize,
    pub time: f32,
    pub cursor_x: f32,
    pub cursor_y: f32,
    pub gaze_x: f32,
    pub gaze_y: f32,
    pub pupil_left: Option<f32>,
    pub pupil_right: Option<f32>,
    pub head_x: f32,
    pub head_y: f32,
    pub head_z: f32,
    pub nose_x: f32,
    pub nose_y: f32,
    pub hmd_pos_x: Option<f32>,
    pub hmd_pos_y: Option<f32>,
    pub hmd_pos_z: Option<f32>,
    pub hmd_rot_x: Option<f32>,
    pub hmd_rot_y: Option<f32>,
    pub hmd_rot_z: Option<f32>,
    pub hmd_rot_w: Option<f32>,
}

impl TestTrialDto {
    /// Column names, in serialization order
    pub const FIELDS: [&'static str; 13] = [
        "trial_number",
        "start_time",
        "target_angle",
        "time_to_first_entry",
        "time_to_activation",
        "center_error_x",
        "center_error_y",
        "cursor_movement",
        "head_movement",
        "effective_amplitude",
        "timed_out",
        "error",
        "log_count",
    ];
}

impl DataLogDto {
    /// Column names, in serialization order
    pub const FIELDS: [&'static str; 21] = [
        "trial_number",
        "sample_index",
        "time",
        "cursor_x",
        "cursor_y",
        "gaze_x",
        "gaze_y",
        "pupil_left",
        "pupil_right",
        "head_x",
        "head_y",
        "head_z",
        "nose_x",
        "nose_y",
        "hmd_pos_x",
        "hmd_pos_y",
        "hmd_pos_z",
        "hmd_rot_x",
        "hmd_rot_y",
        "hmd_rot_z",
        "hmd_rot_w",
    ];

    pub fn from_log(trial_number: u32, sample_index: usize, log: &DataLog) -> Self {
        let cursor = log.cursor_position();
        let gaze = log.gaze_position();
        let head = log.head_movement();
        let nose = log.nose_position();
        let pos = log.hmd_position();
        let rot = log.hmd_rotation();

        Self {
            trial_number,
            sample_index,
            time: log.time(),
            cursor_x: cursor.x,
            cursor_y: cursor.y,
            gaze_x: gaze.x,
            gaze_y: gaze.y,
            pupil_left: log.pupil_diameter_left(),
            pupil_right: log.pupil_diameter_right(),
            head_x: head.x,
            head_y: head.y,
            head_z: head.z,
            nose_x: nose.x,
            nose_y: nose.y,
            hmd_pos_x: pos.map(|p| p.x),
            hmd_pos_y: pos.map(|p| p.y),
            hmd_pos_z: pos.map(|p| p.z),
            hmd_rot_x: rot.map(|r| r.x),
            hmd_rot_y: rot.map(|r| r.y),
            hmd_rot_z: rot.map(|r| r.z),
            hmd_rot_w: rot.map(|r| r.w),
        }
    }
}
