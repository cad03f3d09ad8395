use std::collections::BTreeMap;
use std::path::PathBuf;

use guide_types::Mesh;
use serde::{Deserialize, Serialize};

/// Outcome class of one orchestrator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanStatus {
    /// One operand order produced a usable mesh.
    Success,
    /// Neither order worked; the preprocessed base mesh is returned.
    Fallback,
    /// An operand was missing; no guide.
    Failed,
}

impl BooleanStatus {
    /// Fallback guides may only be used after a manual review.
    pub fn requires_manual_review(self) -> bool {
        self == BooleanStatus::Fallback
    }

    pub fn produced_guide(self) -> bool {
        self != BooleanStatus::Failed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BooleanStatus::Success => "success",
            BooleanStatus::Fallback => "fallback",
            BooleanStatus::Failed => "failed",
        }
    }
}

/// Operand order of one boolean attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BooleanAttempt {
    BaseMinusSubtract,
    SubtractMinusBase,
}

impl BooleanAttempt {
    pub const ORDER: [BooleanAttempt; 2] = [
        BooleanAttempt::BaseMinusSubtract,
        BooleanAttempt::SubtractMinusBase,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BooleanAttempt::BaseMinusSubtract => "base-minus-subtract",
            BooleanAttempt::SubtractMinusBase => "subtract-minus-base",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    /// The base mesh stands in for the guide; channels are not cut.
    ChannelOnly,
}

/// Result of `BooleanOrchestrator::difference`. Built once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct BooleanResult {
    #[serde(skip)]
    pub mesh: Option<Mesh>,
    pub status: BooleanStatus,
    /// Whether both operands went through the preprocessing chain.
    pub preprocessed: bool,
    pub attempts: Vec<BooleanAttempt>,
    /// Artifact name (`base_mesh`, `subtract_mesh`, `params`, `snapshot`) to
    /// the file written for it.
    pub failure_artifacts: BTreeMap<String, PathBuf>,
    pub fallback_mode: Option<FallbackMode>,
    pub reason: Option<String>,
}

impl BooleanResult {
    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self {
            mesh: None,
            status: BooleanStatus::Failed,
            preprocessed: false,
            attempts: Vec::new(),
            failure_artifacts: BTreeMap::new(),
            fallback_mode: None,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_contract() {
        assert!(BooleanStatus::Fallback.requires_manual_review());
        assert!(!BooleanStatus::Success.requires_manual_review());
        assert!(BooleanStatus::Fallback.produced_guide());
        assert!(!BooleanStatus::Failed.produced_guide());
    }

    #[test]
    fn labels_match_serde_names() {
        for attempt in BooleanAttempt::ORDER {
            assert_eq!(
                serde_json::to_value(attempt).unwrap(),
                serde_json::Value::from(attempt.label())
            );
        }
    }

    #[test]
    fn result_serializes_without_mesh() {
        let json = serde_json::to_value(BooleanResult::failed("input mesh missing")).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json.get("mesh").is_none());
        assert_eq!(json["attempts"], serde_json::json!([]));
    }
}
