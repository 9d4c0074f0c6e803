//! Import status lifecycle.
//!
//! An import starts `pending`, moves to `processing` while the workbook is
//! parsed, and ends `completed` or `error`. Final states never change.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ParseResult;

/// Status of one import record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Error,
}

/// A status change that the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid import status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: ImportStatus,
    pub to: ImportStatus,
}

impl ImportStatus {
    /// Lowercase name, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Pending => "pending",
            ImportStatus::Processing => "processing",
            ImportStatus::Completed => "completed",
            ImportStatus::Error => "error",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ImportStatus::Completed | ImportStatus::Error)
    }

    /// Whether `next` may follow `self`.
    pub fn can_transition(&self, next: ImportStatus) -> bool {
        matches!(
            (self, next),
            (ImportStatus::Pending, ImportStatus::Processing)
                | (ImportStatus::Processing, ImportStatus::Completed)
                | (ImportStatus::Processing, ImportStatus::Error)
        )
    }

    /// Move to `next`, or report why the lifecycle forbids it.
    pub fn transition(self, next: ImportStatus) -> Result<ImportStatus, InvalidTransition> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Final status for a finished parse.
    pub fn from_result(result: &ParseResult) -> Self {
        if result.success {
            ImportStatus::Completed
        } else {
            ImportStatus::Error
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
