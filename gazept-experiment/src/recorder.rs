use gazept_core::{DataLog, DataLogDto, Quat, TestTrial, TestTrialDto, Vec2, Vec3};
use gazept_timing::Clock;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RecorderConfig;
use crate::error::RecorderError;
use crate::export::SessionExport;
use crate::layout::TargetLayout;
use crate::summary::SessionSummary;

/// Raw tracker readings for one frame, before they are time-stamped
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleInput {
    pub cursor: Vec2,
    pub gaze: Vec2,
    pub pupil_left: Option<f32>,
    pub pupil_right: Option<f32>,
    pub head: Vec3,
    pub nose: Vec2,
    pub hmd_position: Option<Vec3>,
    pub hmd_rotation: Option<Quat>,
}

#[derive(Debug)]
struct ActiveTrial {
    trial: TestTrial,
    target_center: Vec2,
    started_at: f64,
    last_cursor: Option<Vec2>,
    activated: bool,
}

/// Drives one `TestTrial` at a time and collects the finished DTOs
pub struct TrialRecorder<C>
where
    C: Clock,
{
    pub clock: C,
    pub config: RecorderConfig,
    pub layout: TargetLayout,
    current: Option<ActiveTrial>,
    trial_number: u32,
    sequence_offset: u32,
    previous_center: Vec2,
    export: SessionExport,
}

impl<C> TrialRecorder<C>
where
    C: Clock,
{
    /// `rng` only picks the starting ring position when `randomize_start` is set
    pub fn new<R: Rng>(config: RecorderConfig, clock: C, rng: &mut R) -> Self {
        let layout = TargetLayout::new(config.screen_center, config.ring_radius, config.target_count);
        let sequence_offset = if config.randomize_start {
            rng.random_range(0..layout.count)
        } else {
            0
        };

        Self {
            clock,
            // pointer starts at the middle of the ring
            previous_center: layout.center,
            layout,
            config,
            current: None,
            trial_number: 0,
            sequence_offset,
            export: SessionExport::default(),
        }
    }

    pub fn begin_trial(&mut self) -> Result<&TestTrial, RecorderError> {
        if let Some(active) = &self.current {
            return Err(RecorderError::TrialInProgress(active.trial.trial_number()));
        }

        let index = self
            .layout
            .target_for_trial(self.trial_number, self.sequence_offset);
        let angle = self.layout.angle_of(index);
        let target_center = self.layout.center_of(index);
        let now = self.clock.now_s();

        info!(
            "Trial {} started at {:.3} s, target {} at {:.1} deg",
            self.trial_number, now, index, angle
        );

        let active = self.current.insert(ActiveTrial {
            trial: TestTrial::new(self.trial_number, now as f32, angle),
            target_center,
            started_at: now,
            last_cursor: None,
            activated: false,
        });
        Ok(&active.trial)
    }

    /// Appends one sample to the active trial.
    ///
    /// Returns `Ok(false)` when the sample was dropped because the trial is
    /// already at `max_samples_per_trial`.
    pub fn record_sample(&mut self, input: SampleInput) -> Result<bool, RecorderError> {
        let elapsed = self.elapsed()?;
        let max_samples = self.config.max_samples_per_trial;
        let timeout = self.config.trial_timeout_s as f64;
        let half_width = self.config.target_width / 2.0;
        let active = self.current.as_mut().ok_or(RecorderError::NoActiveTrial)?;
        let trial_number = active.trial.trial_number();

        if active.trial.logs().len() >= max_samples {
            warn!(
                "Trial {}: sample limit {} reached, dropping sample at {:.3} s",
                trial_number, max_samples, elapsed
            );
            return Ok(false);
        }

        if let Some(last) = active.last_cursor {
            active.trial.cursor_movement += last.distance(input.cursor);
        }
        active.last_cursor = Some(input.cursor);
        active.trial.head_movement += input.head.length();

        if active.trial.time_to_first_entry.is_none()
            && input.cursor.distance(active.target_center) <= half_width
        {
            active.trial.time_to_first_entry = Some(elapsed as f32);
            debug!("Trial {}: target entered at {:.3} s", trial_number, elapsed);
        }

        if !active.activated && !active.trial.timed_out && elapsed >= timeout {
            active.trial.timed_out = true;
            warn!(
                "Trial {} timed out after {:.3} s without activation",
                trial_number, elapsed
            );
        }

        let mut log = DataLog::new(elapsed as f32, input.cursor, input.gaze, input.head, input.nose)
            .with_pupils(input.pupil_left, input.pupil_right);
        if let (Some(pos), Some(rot)) = (input.hmd_position, input.hmd_rotation) {
            log = log.with_hmd_pose(pos, rot);
        }
        active.trial.push_log(log);
        Ok(true)
    }

    /// Selection at `point`; returns the effective amplitude of the movement
    pub fn activate(&mut self, point: Vec2) -> Result<f32, RecorderError> {
        let elapsed = self.elapsed()?;
        let half_width = self.config.target_width / 2.0;
        let previous_center = self.previous_center;
        let active = self.current.as_mut().ok_or(RecorderError::NoActiveTrial)?;

        if active.activated {
            return Err(RecorderError::AlreadyActivated(active.trial.trial_number()));
        }
        active.activated = true;

        let trial = &mut active.trial;
        trial.time_to_activation = elapsed as f32;
        trial.center_error = point - active.target_center;
        trial.error = trial.center_error.length() > half_width;
        let amplitude =
            trial.calculate_effective_amplitude(previous_center, active.target_center, point);

        info!(
            "Trial {} activated at {:.3} s, Ae = {:.1}, error = {}",
            trial.trial_number(),
            elapsed,
            amplitude,
            trial.error
        );
        Ok(amplitude)
    }

    pub fn time_out(&mut self) -> Result<(), RecorderError> {
        let active = self.current.as_mut().ok_or(RecorderError::NoActiveTrial)?;
        active.trial.timed_out = true;
        Ok(())
    }

    /// Ends the active trial and hands back its DTOs. Copies are also kept in
    /// the session export.
    pub fn finish_trial(&mut self) -> Result<(TestTrialDto, Vec<DataLogDto>), RecorderError> {
        let elapsed = self.elapsed()?;
        let mut active = self.current.take().ok_or(RecorderError::NoActiveTrial)?;

        if !active.activated && elapsed >= self.config.trial_timeout_s as f64 {
            active.trial.timed_out = true;
        }

        self.previous_center = active.target_center;
        self.trial_number += 1;

        let (dto, logs) = active.trial.into_dtos();
        info!(
            "Trial {} finished: {} samples, timed out = {}, error = {}",
            dto.trial_number, dto.log_count, dto.timed_out, dto.error
        );

        self.export.trials.push(dto.clone());
        self.export.logs.extend(logs.iter().cloned());
        Ok((dto, logs))
    }

    fn elapsed(&self) -> Result<f64, RecorderError> {
        let active = self.current.as_ref().ok_or(RecorderError::NoActiveTrial)?;
        Ok(self.clock.elapsed_since(active.started_at))
    }

    pub fn current_trial(&self) -> Option<&TestTrial> {
        self.current.as_ref().map(|a| &a.trial)
    }

    pub fn current_target(&self) -> Option<Vec2> {
        self.current.as_ref().map(|a| a.target_center)
    }

    pub fn trials_completed(&self) -> u32 {
        self.trial_number
    }

    pub fn export(&self) -> &SessionExport {
        &self.export
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_trials(&self.export.trials, self.config.target_width)
    }

    pub fn into_export(self) -> SessionExport {
        if let Some(active) = &self.current {
            warn!(
                "Trial {} was never finished and is not exported",
                active.trial.trial_number()
            );
        }
        self.export
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazept_timing::ManualClock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn recorder() -> (TrialRecorder<ManualClock>, ManualClock) {
        let config = RecorderConfig {
            target_count: 4,
            ring_radius: 100.0,
            target_width: 20.0,
            screen_center: Vec2::new(500.0, 500.0),
            trial_timeout_s: 2.0,
            max_samples_per_trial: 3,
            randomize_start: false,
        };
        let clock = ManualClock::new();
        let rec = TrialRecorder::new(config, clock.clone(), &mut StdRng::seed_from_u64(7));
        (rec, clock)
    }

    fn at(cursor: Vec2) -> SampleInput {
        SampleInput {
            cursor,
            ..Default::default()
        }
    }

    #[test]
    fn requires_active_trial() {
        let (mut rec, _) = recorder();
        assert!(matches!(
            rec.record_sample(SampleInput::default()),
            Err(RecorderError::NoActiveTrial)
        ));
        assert!(matches!(rec.finish_trial(), Err(RecorderError::NoActiveTrial)));
    }

    #[test]
    fn rejects_overlapping_trials() {
        let (mut rec, _) = recorder();
        rec.begin_trial().unwrap();
        assert!(matches!(
            rec.begin_trial(),
            Err(RecorderError::TrialInProgress(0))
        ));
    }

    #[test]
    fn start_time_and_number_come_from_recorder() {
        let (mut rec, clock) = recorder();
        clock.set_s(10.0);
        let trial = rec.begin_trial().unwrap();
        assert_eq!(trial.trial_number(), 0);
        assert_eq!(trial.start_time(), 10.0);
        assert_eq!(trial.target_angle, 0.0);
    }

    #[test]
    fn full_trial_flow() {
        let (mut rec, clock) = recorder();
        clock.set_s(1.0);
        rec.begin_trial().unwrap();
        // target 0 sits at (600, 500)
        assert_eq!(rec.current_target(), Some(Vec2::new(600.0, 500.0)));

        clock.advance(Duration::from_millis(100));
        rec.record_sample(at(Vec2::new(500.0, 500.0))).unwrap();
        clock.advance(Duration::from_millis(100));
        rec.record_sample(at(Vec2::new(560.0, 500.0))).unwrap();
        clock.advance(Duration::from_millis(100));
        rec.record_sample(at(Vec2::new(595.0, 500.0))).unwrap();

        let amp = rec.activate(Vec2::new(596.0, 503.0)).unwrap();
        // 100 from the ring center, then 5 to the activation point
        assert!((amp - 105.0).abs() < 1e-3);

        let (dto, logs) = rec.finish_trial().unwrap();
        assert_eq!(dto.log_count, 3);
        assert!((dto.time_to_first_entry.unwrap() - 0.3).abs() < 1e-4);
        assert!((dto.time_to_activation - 0.3).abs() < 1e-4);
        assert_eq!(dto.cursor_movement, 95.0);
        assert_eq!(dto.center_error_x, -4.0);
        assert_eq!(dto.center_error_y, 3.0);
        assert!(!dto.error);
        assert!(!dto.timed_out);
        assert_eq!(logs.len(), 3);
        assert!((logs[0].time - 0.1).abs() < 1e-4);
        assert_eq!(rec.trials_completed(), 1);
        assert_eq!(rec.export().trials.len(), 1);
        assert_eq!(rec.export().logs.len(), 3);
    }

    #[test]
    fn amplitude_uses_previous_target() {
        let (mut rec, _) = recorder();
        rec.begin_trial().unwrap();
        rec.activate(Vec2::new(600.0, 500.0)).unwrap();
        rec.finish_trial().unwrap();

        // 4 targets: sequence 0, 2, 1, 3 so the second target is opposite
        rec.begin_trial().unwrap();
        let target = rec.current_target().unwrap();
        assert!((target.x - 400.0).abs() < 1e-3);
        let amp = rec.activate(target).unwrap();
        assert!((amp - 200.0).abs() < 1e-3);
    }

    #[test]
    fn miss_sets_error_flag() {
        let (mut rec, _) = recorder();
        rec.begin_trial().unwrap();
        rec.activate(Vec2::new(650.0, 500.0)).unwrap();
        let (dto, _) = rec.finish_trial().unwrap();
        assert!(dto.error);
        assert_eq!(dto.center_error_x, 50.0);
    }

    #[test]
    fn second_activation_is_rejected() {
        let (mut rec, _) = recorder();
        rec.begin_trial().unwrap();
        rec.activate(Vec2::new(600.0, 500.0)).unwrap();
        assert!(matches!(
            rec.activate(Vec2::new(600.0, 500.0)),
            Err(RecorderError::AlreadyActivated(0))
        ));
    }

    #[test]
    fn samples_past_limit_are_dropped() {
        let (mut rec, _) = recorder();
        rec.begin_trial().unwrap();
        for _ in 0..3 {
            assert!(rec.record_sample(SampleInput::default()).unwrap());
        }
        assert!(!rec.record_sample(SampleInput::default()).unwrap());
        assert_eq!(rec.current_trial().unwrap().logs().len(), 3);
    }

    #[test]
    fn unactivated_trial_times_out() {
        let (mut rec, clock) = recorder();
        rec.begin_trial().unwrap();
        clock.advance(Duration::from_millis(2500));
        let (dto, _) = rec.finish_trial().unwrap();
        assert!(dto.timed_out);
        assert_eq!(dto.effective_amplitude, 0.0);
    }

    #[test]
    fn explicit_timeout_flag() {
        let (mut rec, _) = recorder();
        rec.begin_trial().unwrap();
        rec.time_out().unwrap();
        let (dto, _) = rec.finish_trial().unwrap();
        assert!(dto.timed_out);
    }

    #[test]
    fn head_movement_accumulates() {
        let (mut rec, _) = recorder();
        rec.begin_trial().unwrap();
        for _ in 0..2 {
            rec.record_sample(SampleInput {
                head: Vec3::new(0.0, 3.0, 4.0),
                ..Default::default()
            })
            .unwrap();
        }
        assert_eq!(rec.current_trial().unwrap().head_movement, 10.0);
    }

    #[test]
    fn sample_at_exact_timeout_flags_trial() {
        let (mut rec, clock) = recorder();
        rec.begin_trial().unwrap();
        clock.set_s(2.0);
        rec.record_sample(SampleInput::default()).unwrap();
        assert!(rec.current_trial().unwrap().timed_out);
    }

    #[test]
    fn finish_at_exact_timeout_flags_trial() {
        let (mut rec, clock) = recorder();
        rec.begin_trial().unwrap();
        clock.set_s(2.0);
        let (dto, _) = rec.finish_trial().unwrap();
        assert!(dto.timed_out);
    }

    #[test]
    fn activation_before_late_samples_keeps_trial_in_time() {
        let (mut rec, clock) = recorder();
        rec.begin_trial().unwrap();
        clock.set_s(0.5);
        rec.activate(Vec2::new(600.0, 500.0)).unwrap();
        clock.set_s(3.0);
        rec.record_sample(SampleInput::default()).unwrap();
        let (dto, _) = rec.finish_trial().unwrap();
        assert!(!dto.timed_out);
    }

    #[test]
    fn entry_at_trial_start_differs_from_no_entry() {
        let (mut rec, _) = recorder();
        rec.begin_trial().unwrap();
        rec.record_sample(at(Vec2::new(600.0, 500.0))).unwrap();
        let (entered, _) = rec.finish_trial().unwrap();
        assert_eq!(entered.time_to_first_entry, Some(0.0));

        rec.begin_trial().unwrap();
        rec.record_sample(at(Vec2::new(500.0, 500.0))).unwrap();
        let (missed, _) = rec.finish_trial().unwrap();
        assert_eq!(missed.time_to_first_entry, None);
    }

    #[test]
    fn randomized_start_stays_on_ring() {
        let config = RecorderConfig {
            randomize_start: true,
            ..RecorderConfig::default()
        };
        let mut rec = TrialRecorder::new(config, ManualClock::new(), &mut StdRng::seed_from_u64(11));
        rec.begin_trial().unwrap();
        let target = rec.current_target().unwrap();
        assert!((rec.layout.center.distance(target) - 300.0).abs() < 1e-3);
    }
}
