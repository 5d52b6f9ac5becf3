use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of processing one payroll row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    Sent {
        email: String,
        sent_at: DateTime<Utc>,
    },
    Failed {
        email: String,
        error: String,
    },
}

impl BatchOutcome {
    pub fn success(email: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        BatchOutcome::Sent {
            email: email.into(),
            sent_at,
        }
    }

    pub fn failure(email: impl Into<String>, error: impl ToString) -> Self {
        BatchOutcome::Failed {
            email: email.into(),
            error: error.to_string(),
        }
    }

    pub fn email(&self) -> &str {
        match self {
            BatchOutcome::Sent { email, .. } | BatchOutcome::Failed { email, .. } => email,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Sent { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BatchOutcome::Failed { error, .. } => Some(error),
            BatchOutcome::Sent { .. } => None,
        }
    }
}

/// Status reported once every row of a batch has an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
}

/// Per-row report returned to the caller.
///
/// `status` says the batch ran to completion; row failures only show up in
/// `results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub status: BatchStatus,
    pub results: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn completed(results: Vec<BatchOutcome>) -> Self {
        Self {
            status: BatchStatus::Success,
            results,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}
