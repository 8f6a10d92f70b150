use std::path::Path;

use anyhow::{Context, Result};
use gazept_core::Vec2;
use gazept_experiment::{RecorderConfig, SampleInput, SessionExport, SessionSummary, TrialRecorder};
use gazept_timing::ManualClock;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One tracker frame; `t` is seconds since the trial started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSample {
    pub t: f64,
    #[serde(flatten)]
    pub input: SampleInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedActivation {
    pub t: f64,
    pub point: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedTrial {
    /// Seconds since the session started
    pub start_s: f64,
    #[serde(default)]
    pub samples: Vec<RecordedSample>,
    #[serde(default)]
    pub activation: Option<RecordedActivation>,
    #[serde(default)]
    pub timed_out: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedSession {
    pub trials: Vec<RecordedTrial>,
}

impl RecordedSession {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read session file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("cannot parse session file {}", path.display()))
    }
}

enum ReplayEvent<'a> {
    Sample(&'a RecordedSample),
    Activation(&'a RecordedActivation),
}

impl ReplayEvent<'_> {
    fn t(&self) -> f64 {
        match self {
            ReplayEvent::Sample(s) => s.t,
            ReplayEvent::Activation(a) => a.t,
        }
    }
}

impl RecordedTrial {
    /// Samples and the activation merged in time order. A sample sharing its
    /// time with the activation is fed first.
    fn events(&self) -> Vec<ReplayEvent<'_>> {
        let mut events: Vec<ReplayEvent<'_>> =
            self.samples.iter().map(ReplayEvent::Sample).collect();
        if let Some(activation) = &self.activation {
            events.push(ReplayEvent::Activation(activation));
        }
        events.sort_by(|a, b| a.t().total_cmp(&b.t()));
        events
    }
}

/// Feeds a recorded session through a recorder on a manual clock
pub fn replay<R: Rng>(
    session: &RecordedSession,
    config: RecorderConfig,
    rng: &mut R,
) -> Result<(SessionExport, SessionSummary)> {
    let clock = ManualClock::new();
    let mut recorder = TrialRecorder::new(config, clock.clone(), rng);

    for (i, recorded) in session.trials.iter().enumerate() {
        clock.set_s(recorded.start_s);
        recorder
            .begin_trial()
            .with_context(|| format!("recorded trial {i}"))?;

        let mut end_s = 0.0_f64;
        for event in recorded.events() {
            end_s = end_s.max(event.t());
            clock.set_s(recorded.start_s + event.t());
            match event {
                ReplayEvent::Sample(sample) => {
                    recorder.record_sample(sample.input.clone())?;
                }
                ReplayEvent::Activation(activation) => {
                    recorder.activate(activation.point)?;
                }
            }
        }
        if recorded.timed_out {
            recorder.time_out()?;
        }

        clock.set_s(recorded.start_s + end_s);
        recorder.finish_trial()?;
    }

    let summary = recorder.summary();
    Ok((recorder.into_export(), summary))
}
