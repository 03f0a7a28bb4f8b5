use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// Named step durations for one signature run, in the order they were recorded.
#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, Duration>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        self.steps.push(StepTiming {
            name: name.clone(),
            duration,
        });
        *self.step_map.entry(name).or_insert(Duration::ZERO) += duration;
    }

    /// Records a finished [`Timer`].
    pub fn record(&mut self, timer: Timer) {
        let (name, duration) = timer.stop();
        self.add_step(name, duration);
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Accumulated duration of every step recorded under `name`.
    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).copied()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    /// One line per step with its share of the total, then the total.
    pub fn summary(&self) -> Vec<String> {
        let total = self.total_duration();
        let mut lines: Vec<String> = self
            .steps
            .iter()
            .map(|step| {
                let percentage = if total.as_secs_f64() > 0.0 {
                    (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
                } else {
                    0.0
                };
                format!(
                    "{:<20} {:>10.3}ms ({:>5.1}%)",
                    step.name,
                    step.duration.as_secs_f64() * 1000.0,
                    percentage
                )
            })
            .collect();
        lines.push(format!("{:<20} {:>10.3}ms", "total", total.as_secs_f64() * 1000.0));
        lines
    }

    pub fn log_summary(&self) {
        for line in self.summary() {
            debug!("{}", line);
        }
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}
