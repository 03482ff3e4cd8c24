// Sys Manager - Batch Outcomes
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Outcome of an operation applied to several targets (all radios, all
//! monitors). Succeeded targets are never rolled back.

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Overall status of a batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every target succeeded.
    Success,
    /// Some targets succeeded, some failed.
    PartialSuccess,
    /// No target succeeded, or there were no targets.
    Error,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::PartialSuccess => "partial_success",
            Self::Error => "error",
        }
    }
}

/// Per-target tally of a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub operation: String,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            succeeded: 0,
            failed: 0,
        }
    }

    /// Record one target's result.
    pub fn record(&mut self, ok: bool) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn status(&self) -> BatchStatus {
        match (self.succeeded, self.failed) {
            (0, _) => BatchStatus::Error,
            (_, 0) => BatchStatus::Success,
            _ => BatchStatus::PartialSuccess,
        }
    }

    /// Only a full success counts as success.
    pub fn is_success(&self) -> bool {
        self.status() == BatchStatus::Success
    }

    pub fn into_result(self) -> Result<()> {
        match self.status() {
            BatchStatus::Success => Ok(()),
            BatchStatus::PartialSuccess => Err(Error::PartialSuccess {
                operation: self.operation,
                succeeded: self.succeeded,
                failed: self.failed,
            }),
            BatchStatus::Error if self.total() == 0 => {
                Err(Error::operation_failed(self.operation, "no targets"))
            }
            BatchStatus::Error => Err(Error::operation_failed(
                self.operation,
                format!("all {} target(s) failed", self.failed),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_status() {
        let mut outcome = BatchOutcome::new("enable discovery");
        assert_eq!(outcome.status(), BatchStatus::Error);

        outcome.record(true);
        assert_eq!(outcome.status(), BatchStatus::Success);
        assert!(outcome.is_success());

        outcome.record(false);
        assert_eq!(outcome.status(), BatchStatus::PartialSuccess);
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome.into_result(),
            Err(Error::PartialSuccess { succeeded: 1, failed: 1, .. })
        ));
    }

    #[test]
    fn test_empty_batch_is_failure() {
        let outcome = BatchOutcome::new("set brightness");
        assert!(!outcome.is_success());
        assert!(matches!(outcome.into_result(), Err(Error::OperationFailed { .. })));
    }
}
