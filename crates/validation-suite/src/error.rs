use std::path::PathBuf;

/// Structural dataset problems. These abort a run.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset directory does not exist: {}", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("case directory not found: {}", path.display())]
    CaseNotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid ground truth in {}: {reason}", path.display())]
    GroundTruth { path: PathBuf, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("cannot write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        source: std::io::Error,
    },
}
