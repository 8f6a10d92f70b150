use crate::geometry::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// One telemetry sample within a trial.
///
/// Fields are private so a sample cannot change once it has been appended
/// to a trial; use the builder methods before handing it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLog {
    time: f32,
    cursor_position: Vec2,
    gaze_position: Vec2,
    pupil_diameter_left: Option<f32>,
    pupil_diameter_right: Option<f32>,
    head_movement: Vec3,
    nose_position: Vec2,
    hmd_position: Option<Vec3>,
    hmd_rotation: Option<Quat>,
}

impl DataLog {
    /// `time` is seconds elapsed since the trial started
    pub fn new(
        time: f32,
        cursor_position: Vec2,
        gaze_position: Vec2,
        head_movement: Vec3,
        nose_position: Vec2,
    ) -> Self {
        Self {
            time,
            cursor_position,
            gaze_position,
            pupil_diameter_left: None,
            pupil_diameter_right: None,
            head_movement,
            nose_position,
            hmd_position: None,
            hmd_rotation: None,
        }
    }

    pub fn with_pupils(mut self, left: Option<f32>, right: Option<f32>) -> Self {
        self.pupil_diameter_left = left;
        self.pupil_diameter_right = right;
        self
    }

    pub fn with_hmd_pose(mut self, position: Vec3, rotation: Quat) -> Self {
        self.hmd_position = Some(position);
        self.hmd_rotation = Some(rotation);
        self
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn cursor_position(&self) -> Vec2 {
        self.cursor_position
    }

    pub fn gaze_position(&self) -> Vec2 {
        self.gaze_position
    }

    pub fn pupil_diameter_left(&self) -> Option<f32> {
        self.pupil_diameter_left
    }

    pub fn pupil_diameter_right(&self) -> Option<f32> {
        self.pupil_diameter_right
    }

    pub fn head_movement(&self) -> Vec3 {
        self.head_movement
    }

    pub fn nose_position(&self) -> Vec2 {
        self.nose_position
    }

    pub fn hmd_position(&self) -> Option<Vec3> {
        self.hmd_position
    }

    pub fn hmd_rotation(&self) -> Option<Quat> {
        self.hmd_rotation
    }
}
