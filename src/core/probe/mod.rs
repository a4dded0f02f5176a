//! Model enumeration and the probe-and-classify loop.

mod classify;
mod enumerate;
mod runner;
mod summary;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{DefaultClassifier, ErrorClassifier, ErrorSignal, StatusLabel, TallyBucket};
pub use enumerate::{CatalogUnavailable, ModelDescriptor, enumerate_text_models, filter_models};
pub use runner::{
    DEFAULT_DELAY, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_PROMPT, OnResult, ProbeResult, ProbeSettings,
    probe_all,
};
pub use summary::RunSummary;
