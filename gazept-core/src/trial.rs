use crate::data_log::DataLog;
use crate::dto::{DataLogDto, TestTrialDto};
use crate::geometry::Vec2;

/// Measurements for one pointing trial, plus its telemetry samples.
///
/// Trial number and start time are fixed at construction. Everything else is
/// filled in by the runner as the trial progresses.
#[derive(Debug, Clone, PartialEq)]
pub struct TestTrial {
    trial_number: u32,
    start_time: f32,
    pub target_angle: f32,
    /// Seconds until the pointer first entered the target, if it ever did
    pub time_to_first_entry: Option<f32>,
    pub time_to_activation: f32,
    pub center_error: Vec2,
    pub cursor_movement: f32,
    pub head_movement: f32,
    pub timed_out: bool,
    pub error: bool,
    pub effective_amplitude: f32,
    logs: Vec<DataLog>,
}

impl TestTrial {
    pub fn new(trial_number: u32, start_time: f32, target_angle: f32) -> Self {
        Self {
            trial_number,
            start_time,
            target_angle,
            time_to_first_entry: None,
            time_to_activation: 0.0,
            center_error: Vec2::ZERO,
            cursor_movement: 0.0,
            head_movement: 0.0,
            timed_out: false,
            error: false,
            effective_amplitude: 0.0,
            logs: Vec::new(),
        }
    }

    pub fn trial_number(&self) -> u32 {
        self.trial_number
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    pub fn push_log(&mut self, log: DataLog) {
        self.logs.push(log);
    }

    /// Samples in the order they were recorded
    pub fn logs(&self) -> &[DataLog] {
        &self.logs
    }

    /// Path length travelled by an ideal pointer: previous center to the
    /// current center, then on to where the selection actually happened.
    pub fn calculate_effective_amplitude(
        &mut self,
        previous_center: Vec2,
        current_center: Vec2,
        activation_point: Vec2,
    ) -> f32 {
        self.effective_amplitude = previous_center.distance(current_center)
            + current_center.distance(activation_point);
        self.effective_amplitude
    }

    pub fn to_dto(&self) -> TestTrialDto {
        TestTrialDto {
            trial_number: self.trial_number,
            start_time: self.start_time,
            target_angle: self.target_angle,
            time_to_first_entry: self.time_to_first_entry,
            time_to_activation: self.time_to_activation,
            center_error_x: self.center_error.x,
            center_error_y: self.center_error.y,
            cursor_movement: self.cursor_movement,
            head_movement: self.head_movement,
            effective_amplitude: self.effective_amplitude,
            timed_out: self.timed_out,
            error: self.error,
            log_count: self.logs.len(),
        }
    }

    pub fn log_dtos(&self) -> Vec<DataLogDto> {
        self.logs
            .iter()
            .enumerate()
            .map(|(i, log)| DataLogDto::from_log(self.trial_number, i, log))
            .collect()
    }

    /// Converts the trial at its end; the in-memory trial is dropped.
    pub fn into_dtos(self) -> (TestTrialDto, Vec<DataLogDto>) {
        (self.to_dto(), self.log_dtos())
    }
}
