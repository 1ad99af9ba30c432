//! Severity-tagged diagnostic records produced by actions.

use std::fmt;

/// Severity of an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// The action did what it was asked to do.
    Success,
    /// Something unusual happened but the action still completed.
    Warning,
    /// The action could not complete.
    Failure,
}

impl OutcomeKind {
    /// Returns the upper-case tag used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic record appended to a [`Signal`](crate::Signal) while an
/// action runs.
///
/// Outcomes are for operators, not users: the router logs them after the
/// action finishes and never turns them into a chat reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    kind: OutcomeKind,
    message: String,
}

impl Outcome {
    /// Creates an outcome of the given kind.
    pub fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Warning, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Failure, message)
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
