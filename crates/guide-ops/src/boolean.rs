//! Crash-safe boolean difference with ordered fallback.

use std::collections::BTreeMap;

use guide_types::Mesh;
use mesh_kernel::MeshKernel;
use tracing::{debug, error, info, instrument, warn};

use crate::failure::{FailureBundle, FailureStore};
use crate::preprocess::{preprocess, PreprocessParams};
use crate::stage::run_stage;
use crate::types::{BooleanAttempt, BooleanResult, BooleanStatus, FallbackMode};

const MISSING_INPUT: &str = "input mesh missing for boolean difference";
const BOTH_ORDERS_FAILED: &str =
    "boolean operation failed in both operand orders; channel-only fallback activated";

/// Subtracts a channel volume from a guide body.
///
/// Tries `base - subtract`, then `subtract - base`, on preprocessed operands.
/// If neither yields a non-empty mesh the preprocessed base is returned as a
/// channel-only approximation and a failure bundle is written.
pub struct BooleanOrchestrator<'k> {
    kernel: &'k dyn MeshKernel,
    params: PreprocessParams,
    failures: FailureStore,
}

impl<'k> BooleanOrchestrator<'k> {
    pub fn new(kernel: &'k dyn MeshKernel) -> Self {
        Self {
            kernel,
            params: PreprocessParams::default(),
            failures: FailureStore::default(),
        }
    }

    pub fn with_params(mut self, params: PreprocessParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_failure_store(mut self, failures: FailureStore) -> Self {
        self.failures = failures;
        self
    }

    pub fn failure_store(&self) -> &FailureStore {
        &self.failures
    }

    /// Never panics and never returns an error; see [`BooleanStatus`] for
    /// what each outcome means to the caller.
    #[instrument(skip_all, fields(kernel = self.kernel.name()))]
    pub fn difference(&self, base: Option<&Mesh>, subtract: Option<&Mesh>) -> BooleanResult {
        let (Some(base), Some(subtract)) = (base, subtract) else {
            error!(
                base = base.is_some(),
                subtract = subtract.is_some(),
                "{}",
                MISSING_INPUT
            );
            return BooleanResult::failed(MISSING_INPUT);
        };

        let prepared = run_stage("preprocess", || {
            Ok((
                preprocess(self.kernel, base, &self.params),
                preprocess(self.kernel, subtract, &self.params),
            ))
        });
        let (base_pp, subtract_pp, preprocessed) = match prepared {
            Ok((b, s)) => (b, s, true),
            Err(err) => {
                warn!(error = %err, "preprocessing failed, using raw meshes");
                (base.clone(), subtract.clone(), false)
            }
        };

        let mut attempts = Vec::with_capacity(BooleanAttempt::ORDER.len());
        for attempt in BooleanAttempt::ORDER {
            attempts.push(attempt);
            let (a, b) = match attempt {
                BooleanAttempt::BaseMinusSubtract => (&base_pp, &subtract_pp),
                BooleanAttempt::SubtractMinusBase => (&subtract_pp, &base_pp),
            };
            match run_stage(attempt.label(), || self.kernel.boolean_difference(a, b)) {
                Ok(mesh) if !mesh.is_empty() => {
                    info!(
                        attempt = attempt.label(),
                        points = mesh.point_count(),
                        polys = mesh.poly_count(),
                        "boolean difference succeeded"
                    );
                    return BooleanResult {
                        mesh: Some(mesh),
                        status: BooleanStatus::Success,
                        preprocessed,
                        attempts,
                        failure_artifacts: BTreeMap::new(),
                        fallback_mode: None,
                        reason: None,
                    };
                }
                Ok(_) => warn!(
                    attempt = attempt.label(),
                    "boolean difference returned an empty mesh"
                ),
                Err(err) if err.is_not_supported() => {
                    debug!(attempt = attempt.label(), error = %err, "kernel has no boolean support")
                }
                Err(err) => {
                    warn!(attempt = attempt.label(), error = %err, "boolean difference failed")
                }
            }
        }

        let failure_artifacts = self.failures.write_bundle(
            self.kernel,
            &FailureBundle {
                base: Some(&base_pp),
                subtract: Some(&subtract_pp),
                strategy: FallbackMode::ChannelOnly,
                attempts: &attempts,
                reason: BOTH_ORDERS_FAILED,
            },
        );
        error!(
            artifacts = failure_artifacts.len(),
            root = %self.failures.root().display(),
            "{}",
            BOTH_ORDERS_FAILED
        );

        BooleanResult {
            mesh: Some(base_pp),
            status: BooleanStatus::Fallback,
            preprocessed,
            attempts,
            failure_artifacts,
            fallback_mode: Some(FallbackMode::ChannelOnly),
            reason: Some(BOTH_ORDERS_FAILED.to_string()),
        }
    }
}
