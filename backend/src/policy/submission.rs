//! Policy Submission - validated hand-off to the persistence sink
//!
//! # Critical Invariants
//!
//! - **Validated**: a submission can only be built from a policy that passes `validate`
//! - **Stable hash**: the same policy always hashes to the same `config_hash`,
//!   so the sink can skip unchanged re-submissions

use super::types::RetryPolicy;
use super::validation::{validate, ValidationError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

/// Reasons a policy cannot be submitted
#[derive(Debug, Error, PartialEq)]
pub enum SubmissionError {
    #[error("Policy failed validation with {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("Policy serialization failed: {0}")]
    Serialization(String),
}

/// A validated policy ready for the persistence sink
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySubmission {
    /// Unique id for this hand-off (UUID v4)
    pub submission_id: String,

    /// SHA256 of the policy's canonical JSON
    pub config_hash: String,

    pub policy: RetryPolicy,
}

impl PolicySubmission {
    /// Validate a policy and wrap it for submission
    ///
    /// # Example
    /// ```
    /// use callwave_core_rs::{PolicySubmission, RetryPolicy};
    ///
    /// let submission = PolicySubmission::prepare(&RetryPolicy::default()).unwrap();
    /// assert_eq!(submission.config_hash.len(), 64);
    ///
    /// let bad = RetryPolicy { max_retries: 50, ..RetryPolicy::default() };
    /// assert!(PolicySubmission::prepare(&bad).is_err());
    /// ```
    pub fn prepare(policy: &RetryPolicy) -> Result<Self, SubmissionError> {
        validate(policy).map_err(SubmissionError::Invalid)?;
        let config_hash = config_hash(policy)?;
        let submission = Self {
            submission_id: uuid::Uuid::new_v4().to_string(),
            config_hash,
            policy: policy.clone(),
        };
        info!(
            submission_id = %submission.submission_id,
            config_hash = %submission.config_hash,
            "retry policy ready for submission"
        );
        Ok(submission)
    }

    /// Whether this submission carries the same configuration as `other`
    pub fn same_config(&self, other: &PolicySubmission) -> bool {
        self.config_hash == other.config_hash
    }
}

/// Compute the SHA256 hash of a policy
///
/// Hashes the struct's serialized JSON. Field order is fixed by the struct
/// definition, so the encoding is canonical without a key sort.
pub fn config_hash(policy: &RetryPolicy) -> Result<String, SubmissionError> {
    let json = serde_json::to_string(policy)
        .map_err(|e| SubmissionError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    Ok(format!("{:x}", result))
}
