use gazept_core::TestTrialDto;
use log::info;
use serde::Serialize;

/// Fitts-style aggregate over the finished trials of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub trials: usize,
    pub successful: usize,
    pub error_rate: f64,
    pub timeout_rate: f64,
    pub mean_activation_time_s: f64,
    pub mean_effective_amplitude: f64,
    /// log2(Ae / W + 1), bits
    pub mean_effective_id: f64,
    /// bits per second
    pub throughput: f64,
}

impl SessionSummary {
    pub fn from_trials(trials: &[TestTrialDto], target_width: f32) -> Self {
        let total = trials.len();
        if total == 0 {
            return Self {
                trials: 0,
                successful: 0,
                error_rate: 0.0,
                timeout_rate: 0.0,
                mean_activation_time_s: 0.0,
                mean_effective_amplitude: 0.0,
                mean_effective_id: 0.0,
                throughput: 0.0,
            };
        }

        let errors = trials.iter().filter(|t| t.error).count();
        let timeouts = trials.iter().filter(|t| t.timed_out).count();
        let ok: Vec<&TestTrialDto> = trials
            .iter()
            .filter(|t| !t.error && !t.timed_out && t.time_to_activation > 0.0)
            .collect();

        let width = target_width.max(f32::EPSILON) as f64;
        let ids: Vec<f64> = ok
            .iter()
            .map(|t| (t.effective_amplitude as f64 / width + 1.0).log2())
            .collect();

        Self {
            trials: total,
            successful: ok.len(),
            error_rate: errors as f64 / total as f64,
            timeout_rate: timeouts as f64 / total as f64,
            mean_activation_time_s: mean(ok.iter().map(|t| t.time_to_activation as f64)),
            mean_effective_amplitude: mean(ok.iter().map(|t| t.effective_amplitude as f64)),
            mean_effective_id: mean(ids.iter().copied()),
            throughput: mean(
                ok.iter()
                    .zip(&ids)
                    .map(|(t, id)| id / t.time_to_activation as f64),
            ),
        }
    }

    pub fn log(&self) {
        info!(
            "Trials: {}, successful: {}, error rate {:.1}%, timeout rate {:.1}%",
            self.trials,
            self.successful,
            self.error_rate * 100.0,
            self.timeout_rate * 100.0
        );
        info!(
            "Activation time: mean {:.3} s, Ae mean {:.1}, IDe mean {:.2} bits, throughput {:.2} bits/s",
            self.mean_activation_time_s,
            self.mean_effective_amplitude,
            self.mean_effective_id,
            self.throughput
        );
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(n: u32, amplitude: f32, time: f32, error: bool, timed_out: bool) -> TestTrialDto {
        TestTrialDto {
            trial_number: n,
            start_time: 0.0,
            target_angle: 0.0,
            time_to_first_entry: None,
            time_to_activation: time,
            center_error_x: 0.0,
            center_error_y: 0.0,
            cursor_movement: 0.0,
            head_movement: 0.0,
            effective_amplitude: amplitude,
            timed_out,
            error,
            log_count: 0,
        }
    }

    #[test]
    fn empty_session_is_all_zero() {
        let s = SessionSummary::from_trials(&[], 60.0);
        assert_eq!(s.trials, 0);
        assert_eq!(s.throughput, 0.0);
    }

    #[test]
    fn throughput_over_successful_trials() {
        // Ae / W = 3 and 7 give IDs of 2 and 3 bits
        let trials = [
            trial(0, 180.0, 1.0, false, false),
            trial(1, 420.0, 1.5, false, false),
            trial(2, 300.0, 0.8, true, false),
            trial(3, 0.0, 0.0, false, true),
        ];
        let s = SessionSummary::from_trials(&trials, 60.0);
        assert_eq!(s.trials, 4);
        assert_eq!(s.successful, 2);
        assert_eq!(s.error_rate, 0.25);
        assert_eq!(s.timeout_rate, 0.25);
        assert!((s.mean_effective_id - 2.5).abs() < 1e-9);
        assert!((s.mean_activation_time_s - 1.25).abs() < 1e-9);
        assert!((s.mean_effective_amplitude - 300.0).abs() < 1e-9);
        assert!((s.throughput - 2.0).abs() < 1e-9);
    }
}
