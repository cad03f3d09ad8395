//! Failure bundles: on-disk snapshots of boolean operations that fell back.
//!
//! Layout under the store root:
//!
//! ```text
//! failure_<YYYYmmddTHHMMSSZ>[_<suffix>]/
//!     base.vtp        (when the kernel can write meshes)
//!     subtract.vtp    (when the kernel can write meshes)
//!     params.json
//!     snapshot.log
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use guide_types::Mesh;
use mesh_kernel::MeshKernel;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::stage::run_stage;
use crate::types::{BooleanAttempt, FallbackMode};

pub const DEFAULT_FAILURE_ROOT: &str = "logs/guide_failures";

/// What a bundle captures.
#[derive(Debug, Clone)]
pub struct FailureBundle<'a> {
    pub base: Option<&'a Mesh>,
    pub subtract: Option<&'a Mesh>,
    pub strategy: FallbackMode,
    pub attempts: &'a [BooleanAttempt],
    pub reason: &'a str,
}

#[derive(Serialize)]
struct BundleParams<'a> {
    strategy: FallbackMode,
    attempts: &'a [BooleanAttempt],
}

/// Directory that receives failure bundles, one subdirectory each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureStore {
    root: PathBuf,
}

impl Default for FailureStore {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_ROOT)
    }
}

impl FailureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a bundle and return the artifacts that made it to disk.
    ///
    /// Never fails: each artifact is written independently, and a failure
    /// only drops that artifact. If the bundle directory itself cannot be
    /// created the map is empty.
    pub fn write_bundle(
        &self,
        kernel: &dyn MeshKernel,
        bundle: &FailureBundle<'_>,
    ) -> BTreeMap<String, PathBuf> {
        let mut artifacts = BTreeMap::new();
        let dir = match self.create_bundle_dir() {
            Ok(dir) => dir,
            Err(err) => {
                warn!(
                    root = %self.root.display(),
                    error = %err,
                    "cannot create failure bundle directory"
                );
                return artifacts;
            }
        };

        for (key, file, mesh) in [
            ("base_mesh", "base.vtp", bundle.base),
            ("subtract_mesh", "subtract.vtp", bundle.subtract),
        ] {
            let Some(mesh) = mesh else { continue };
            let path = dir.join(file);
            match run_stage("write_mesh", || kernel.write_mesh(mesh, &path)) {
                Ok(()) => {
                    artifacts.insert(key.to_string(), path);
                }
                Err(err) if err.is_not_supported() => {
                    debug!(artifact = key, "kernel cannot serialize meshes, skipping");
                }
                Err(err) => {
                    warn!(artifact = key, error = %err, "mesh snapshot not written");
                }
            }
        }

        let params = BundleParams {
            strategy: bundle.strategy,
            attempts: bundle.attempts,
        };
        let params_path = dir.join("params.json");
        let written = serde_json::to_string_pretty(&params)
            .map_err(io::Error::from)
            .and_then(|json| fs::write(&params_path, json));
        match written {
            Ok(()) => {
                artifacts.insert("params".to_string(), params_path);
            }
            Err(err) => warn!(error = %err, "params.json not written"),
        }

        let snapshot_path = dir.join("snapshot.log");
        match fs::write(&snapshot_path, bundle.reason) {
            Ok(()) => {
                artifacts.insert("snapshot".to_string(), snapshot_path);
            }
            Err(err) => warn!(error = %err, "snapshot.log not written"),
        }

        debug!(dir = %dir.display(), artifacts = artifacts.len(), "failure bundle written");
        artifacts
    }

    /// Fresh `failure_<timestamp>` directory. A name already taken within
    /// the same second gets a random suffix.
    fn create_bundle_dir(&self) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let dir = self.root.join(format!("failure_{}", stamp));
        match fs::create_dir(&dir) {
            Ok(()) => Ok(dir),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                let suffix = Uuid::new_v4().simple().to_string();
                let dir = self.root.join(format!("failure_{}_{}", stamp, &suffix[..8]));
                fs::create_dir(&dir)?;
                Ok(dir)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guide_types::primitives::cuboid;
    use mesh_kernel::{NativeKernel, NullKernel};

    fn bundle<'a>(base: Option<&'a Mesh>, attempts: &'a [BooleanAttempt]) -> FailureBundle<'a> {
        FailureBundle {
            base,
            subtract: None,
            strategy: FallbackMode::ChannelOnly,
            attempts,
            reason: "both orders failed",
        }
    }

    #[test]
    fn writes_all_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FailureStore::new(tmp.path().join("failures"));
        let mesh = cuboid([0.0; 3], [1.0; 3]);
        let attempts = BooleanAttempt::ORDER;

        let artifacts = store.write_bundle(&NativeKernel::new(), &bundle(Some(&mesh), &attempts));
        assert_eq!(
            artifacts.keys().map(String::as_str).collect::<Vec<_>>(),
            ["base_mesh", "params", "snapshot"]
        );
        let params: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&artifacts["params"]).unwrap()).unwrap();
        assert_eq!(
            params,
            serde_json::json!({
                "strategy": "channel-only",
                "attempts": ["base-minus-subtract", "subtract-minus-base"]
            })
        );
        assert_eq!(
            fs::read_to_string(&artifacts["snapshot"]).unwrap(),
            "both orders failed"
        );
        let dir_name = artifacts["params"]
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap()
            .to_string();
        assert!(dir_name.starts_with("failure_") && dir_name.contains('T'));
    }

    #[test]
    fn same_second_bundles_get_distinct_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FailureStore::new(tmp.path());
        let kernel = NullKernel::new();
        let a = store.write_bundle(&kernel, &bundle(None, &[]));
        let b = store.write_bundle(&kernel, &bundle(None, &[]));
        assert_ne!(a["params"].parent(), b["params"].parent());
        assert!(!a.contains_key("base_mesh"));
    }

    #[test]
    fn unwritable_root_yields_no_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let store = FailureStore::new(blocker.join("failures"));
        let artifacts = store.write_bundle(&NullKernel::new(), &bundle(None, &[]));
        assert!(artifacts.is_empty());
    }
}
