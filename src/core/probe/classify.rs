//! Status taxonomy and error classification.

use std::fmt;

use serde::Serialize;

/// Outcome of one probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusLabel {
    Active,
    QuotaExceeded,
    PermissionDenied,
    InvalidRequest,
    NotFound,
    OtherError,
}

/// Coarse bucket used by the run summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TallyBucket {
    Active,
    QuotaExceeded,
    Other,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Active => "ACTIVE",
            StatusLabel::QuotaExceeded => "QUOTA_EXCEEDED",
            StatusLabel::PermissionDenied => "PERMISSION_DENIED",
            StatusLabel::InvalidRequest => "INVALID_REQUEST",
            StatusLabel::NotFound => "NOT_FOUND",
            StatusLabel::OtherError => "OTHER_ERROR",
        }
    }

    pub fn bucket(self) -> TallyBucket {
        match self {
            StatusLabel::Active => TallyBucket::Active,
            StatusLabel::QuotaExceeded => TallyBucket::QuotaExceeded,
            _ => TallyBucket::Other,
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Normalized view of a failed call.
///
/// `code` and `status` are set when the transport exposes them; `text` is
/// always the error's display form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorSignal {
    pub code: Option<u16>,
    pub status: Option<String>,
    pub text: String,
}

impl ErrorSignal {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            code: None,
            status: None,
            text: text.into(),
        }
    }
}

/// Maps a failed call to a status label.
pub trait ErrorClassifier {
    fn classify(&self, signal: &ErrorSignal) -> StatusLabel;
}

/// Substring rules for text-only errors, checked in order; first match wins.
const TEXT_RULES: [(&[&str], StatusLabel); 4] = [
    (&["429", "ResourceExhausted"], StatusLabel::QuotaExceeded),
    (&["403", "PermissionDenied"], StatusLabel::PermissionDenied),
    (&["400", "InvalidArgument"], StatusLabel::InvalidRequest),
    (&["404", "NotFound"], StatusLabel::NotFound),
];

/// Prefers the HTTP code or canonical status; falls back to substring search.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultClassifier;

impl DefaultClassifier {
    fn from_code(code: u16) -> StatusLabel {
        match code {
            429 => StatusLabel::QuotaExceeded,
            403 => StatusLabel::PermissionDenied,
            400 => StatusLabel::InvalidRequest,
            404 => StatusLabel::NotFound,
            _ => StatusLabel::OtherError,
        }
    }

    fn from_status(status: &str) -> Option<StatusLabel> {
        match status {
            "RESOURCE_EXHAUSTED" => Some(StatusLabel::QuotaExceeded),
            "PERMISSION_DENIED" => Some(StatusLabel::PermissionDenied),
            "INVALID_ARGUMENT" => Some(StatusLabel::InvalidRequest),
            "NOT_FOUND" => Some(StatusLabel::NotFound),
            _ => None,
        }
    }

    /// Case-sensitive substring classification of raw error text.
    pub fn from_text(text: &str) -> StatusLabel {
        TEXT_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| text.contains(n)))
            .map(|(_, label)| *label)
            .unwrap_or(StatusLabel::OtherError)
    }
}

impl ErrorClassifier for DefaultClassifier {
    fn classify(&self, signal: &ErrorSignal) -> StatusLabel {
        if let Some(label) = signal.status.as_deref().and_then(Self::from_status) {
            return label;
        }
        match signal.code {
            Some(code) => Self::from_code(code),
            None => Self::from_text(&signal.text),
        }
    }
}
