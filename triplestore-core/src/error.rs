// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error type shared by every triplestore crate.

use std::path::PathBuf;
use thiserror::Error;

/// Triple store errors
#[derive(Debug, Error)]
pub enum TripleStoreError {
    /// The subject was never inserted (an emptied partition is not "not found").
    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    #[error("View not found: {0}")]
    ViewNotFound(String),

    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(u64),

    #[error("Graph not found: {0}")]
    GraphNotFound(String),

    /// A partition file could not be parsed. Fatal during startup load.
    #[error("Corrupt partition {path:?}: {reason}")]
    CorruptPartition { path: PathBuf, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Bus error: {0}")]
    Bus(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TripleStoreError {
    /// Not-found errors are recoverable and surfaced to the caller as-is.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TripleStoreError::SubjectNotFound(_)
                | TripleStoreError::ViewNotFound(_)
                | TripleStoreError::SubscriptionNotFound(_)
                | TripleStoreError::GraphNotFound(_)
        )
    }
}

impl From<serde_json::Error> for TripleStoreError {
    fn from(e: serde_json::Error) -> Self {
        TripleStoreError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for TripleStoreError {
    fn from(e: toml::de::Error) -> Self {
        TripleStoreError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TripleStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(TripleStoreError::SubjectNotFound("s".into()).is_not_found());
        assert!(TripleStoreError::ViewNotFound("v".into()).is_not_found());
        assert!(!TripleStoreError::Query("bad".into()).is_not_found());
        assert!(!TripleStoreError::CorruptPartition {
            path: PathBuf::from("x.ttl"),
            reason: "eof".into(),
        }
        .is_not_found());
    }
}
