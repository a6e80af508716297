//! Training step tracer
//!
//! Records wall-clock spans for the generator step, the discriminator step and
//! each of its control terms. Disabled by default; the CLI turns it on in
//! verbose mode and prints [`Tracer::report`] at the end of a run.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// The traced phases of a training iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceStep {
    /// Whole generator update
    GeneratorStep,
    /// Whole discriminator update
    DiscriminatorStep,
    /// Current-batch loss and backward
    Proportional,
    /// Replay-queue loss and backward
    Integral,
    /// Previous-batch delta loss and backward
    Derivative,
    /// Gradient-norm regularizer
    Penalty,
    /// Matrix multiplication kernel
    Matmul,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A single timing measurement.
#[derive(Debug, Clone)]
pub struct TraceMeasurement {
    pub step: TraceStep,
    pub duration: Duration,
    pub metadata: String,
}

/// Thread-safe tracer for collecting timing measurements.
pub struct Tracer {
    measurements: Mutex<Vec<TraceMeasurement>>,
    active_spans: Mutex<HashMap<TraceStep, Instant>>,
    enabled: AtomicBool,
}

impl Tracer {
    pub fn new() -> Self {
        Self {
            measurements: Mutex::new(Vec::new()),
            active_spans: Mutex::new(HashMap::new()),
            enabled: AtomicBool::new(false),
        }
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Start a timing span.
    pub fn start(&self, step: TraceStep) {
        if !self.is_enabled() {
            return;
        }
        let mut spans = self.active_spans.lock().unwrap_or_else(PoisonError::into_inner);
        spans.insert(step, Instant::now());
    }

    /// End a timing span and record measurement.
    pub fn end(&self, step: TraceStep, metadata: impl Into<String>) {
        if !self.is_enabled() {
            return;
        }
        let started = self.active_spans.lock().unwrap_or_else(PoisonError::into_inner).remove(&step);
        if let Some(start) = started {
            let measurement =
                TraceMeasurement { step, duration: start.elapsed(), metadata: metadata.into() };
            self.measurements.lock().unwrap_or_else(PoisonError::into_inner).push(measurement);
        }
    }

    /// Run a closure within a measured span.
    #[inline]
    pub fn span<F, R>(&self, step: TraceStep, metadata: impl Into<String>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.is_enabled() {
            return f();
        }
        self.start(step);
        let result = f();
        self.end(step, metadata);
        result
    }

    /// Like [`Tracer::span`], formatting the metadata only when tracing is enabled.
    #[inline]
    pub fn span_with<M, F, R>(&self, step: TraceStep, metadata: M, f: F) -> R
    where
        M: FnOnce() -> String,
        F: FnOnce() -> R,
    {
        if !self.is_enabled() {
            return f();
        }
        self.start(step);
        let result = f();
        self.end(step, metadata());
        result
    }

    /// Clear all measurements.
    pub fn clear(&self) {
        self.measurements.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.active_spans.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Number of recorded measurements for `step`
    pub fn count(&self, step: TraceStep) -> usize {
        self.measurements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.step == step)
            .count()
    }

    /// Per-step totals, slowest first
    pub fn report(&self) -> String {
        let measurements = self.measurements.lock().unwrap_or_else(PoisonError::into_inner);
        if measurements.is_empty() {
            return "No measurements recorded. Enable tracing with TRACER.enable()".to_string();
        }

        let mut totals: HashMap<TraceStep, (Duration, usize)> = HashMap::new();
        for m in measurements.iter() {
            let entry = totals.entry(m.step).or_default();
            entry.0 += m.duration;
            entry.1 += 1;
        }

        // Both steps enclose every other span; they are the denominator.
        let step_time: Duration = [TraceStep::GeneratorStep, TraceStep::DiscriminatorStep]
            .iter()
            .filter_map(|s| totals.get(s).map(|t| t.0))
            .sum();

        let mut rows: Vec<_> = totals.into_iter().collect();
        rows.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));

        let mut output = String::from("PID-GAN trace report\n");
        output.push_str(&format!("Time in train steps: {step_time:.2?}\n"));
        output.push_str(&format!(
            "{:<18} | {:<8} | {:<15} | {:<8}\n",
            "Step", "Count", "Duration", "% Steps"
        ));
        output.push_str(&format!("{}\n", "-".repeat(58)));
        for (step, (duration, count)) in rows {
            let share = if step_time.as_nanos() > 0 {
                duration.as_secs_f64() / step_time.as_secs_f64() * 100.0
            } else {
                0.0
            };
            output.push_str(&format!(
                "{:<18} | {:<8} | {:<15.2?} | {:>7.2}%\n",
                step.to_string(),
                count,
                duration,
                share
            ));
        }
        output
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new()
    }
}

/// Global tracer instance.
pub static TRACER: LazyLock<Tracer> = LazyLock::new(Tracer::new);
