//! The probe loop: one minimal generation call per model, timed and classified.

use std::time::{Duration, Instant};

use crate::core::backend::ModelBackend;

use super::{ErrorClassifier, StatusLabel};
use super::enumerate::ModelDescriptor;
use super::summary::RunSummary;

pub const DEFAULT_PROMPT: &str = "Hi";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Request shape and pacing for a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeSettings {
    pub prompt: String,
    pub max_output_tokens: u32,
    /// Pause between consecutive probes.
    pub delay: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            delay: DEFAULT_DELAY,
        }
    }
}

/// Outcome of probing one model.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeResult {
    pub model: ModelDescriptor,
    pub status: StatusLabel,
    pub latency: Duration,
}

impl ProbeResult {
    pub fn latency_seconds(&self) -> f64 {
        self.latency.as_secs_f64()
    }
}

/// Called with each result as soon as it is known.
pub type OnResult<'a> = &'a dyn Fn(&ProbeResult);

/// Probe a single model. Never fails: errors become a status label.
pub async fn probe_one<B, C>(
    backend: &B,
    classifier: &C,
    model: ModelDescriptor,
    settings: &ProbeSettings,
) -> ProbeResult
where
    B: ModelBackend,
    C: ErrorClassifier,
{
    let start = Instant::now();
    let outcome = backend
        .generate(&model.name, &settings.prompt, settings.max_output_tokens)
        .await;
    let latency = start.elapsed();

    let status = match outcome {
        Ok(()) => StatusLabel::Active,
        Err(e) => {
            let label = classifier.classify(&e.signal());
            log::debug!("{} failed ({}): {}", model.name, label, e);
            label
        }
    };
    log::info!(
        "{} -> {} in {:.2}s",
        model.name,
        status,
        latency.as_secs_f64()
    );

    ProbeResult {
        model,
        status,
        latency,
    }
}

/// Probe every model in order, one at a time, pausing `settings.delay`
/// between probes. Returns the results in input order plus the tally.
pub async fn probe_all<B, C>(
    backend: &B,
    classifier: &C,
    models: Vec<ModelDescriptor>,
    settings: &ProbeSettings,
    on_result: Option<OnResult<'_>>,
) -> (Vec<ProbeResult>, RunSummary)
where
    B: ModelBackend,
    C: ErrorClassifier,
{
    let count = models.len();
    let mut results = Vec::with_capacity(count);

    for (i, model) in models.into_iter().enumerate() {
        let result = probe_one(backend, classifier, model, settings).await;
        if let Some(callback) = on_result {
            callback(&result);
        }
        results.push(result);

        // No pause after the last probe.
        if i + 1 < count && !settings.delay.is_zero() {
            tokio::time::sleep(settings.delay).await;
        }
    }

    let summary = RunSummary::from_results(&results);
    (results, summary)
}
