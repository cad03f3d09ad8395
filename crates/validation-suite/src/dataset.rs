//! Validation case discovery and loading.
//!
//! A case is one directory:
//!
//! ```text
//! <case>/
//!     cbct/                         optional; the case dir itself otherwise
//!     *ios*.stl | *.stl | *.ply     intraoral scan
//!     *canal*.json|.nii*|.csv       canal annotation
//!     ground_truth_implants.json    or ground_truth.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use guide_types::Implant;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DatasetError;

const IOS_PATTERNS: [&str; 4] = ["*ios*.stl", "*IOS*.stl", "*.stl", "*.ply"];
const CANAL_PATTERNS: [&str; 3] = ["*canal*.json", "*canal*.nii*", "*canal*.csv"];
const GROUND_TRUTH_FILES: [&str; 2] = ["ground_truth_implants.json", "ground_truth.json"];

/// One loaded validation case. Read-only after loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub case_id: String,
    pub cbct_dir: PathBuf,
    pub ios_path: Option<PathBuf>,
    pub canal_path: Option<PathBuf>,
    pub ground_truth_implants: Vec<Implant>,
}

pub fn load_case(dir: &Path) -> Result<CaseRecord, DatasetError> {
    if !dir.is_dir() {
        return Err(DatasetError::CaseNotFound {
            path: dir.to_path_buf(),
        });
    }

    let cbct = dir.join("cbct");
    let cbct_dir = if cbct.exists() { cbct } else { dir.to_path_buf() };

    let entries = file_names(dir)?;
    let ios_path = first_match(&entries, &IOS_PATTERNS).map(|n| dir.join(n));
    let canal_path = first_match(&entries, &CANAL_PATTERNS).map(|n| dir.join(n));

    let gt_path = GROUND_TRUTH_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists());
    let ground_truth_implants = match gt_path {
        Some(path) => load_ground_truth(&path)?,
        None => Vec::new(),
    };

    let record = CaseRecord {
        case_id: case_id(dir),
        cbct_dir,
        ios_path,
        canal_path,
        ground_truth_implants,
    };
    debug!(
        case_id = %record.case_id,
        ios = record.ios_path.is_some(),
        canal = record.canal_path.is_some(),
        implants = record.ground_truth_implants.len(),
        "case loaded"
    );
    Ok(record)
}

/// Sorted case subdirectories of `root`; `root` itself when it has none.
pub fn collect_case_dirs(root: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    if !root.exists() {
        return Err(DatasetError::DatasetNotFound {
            path: root.to_path_buf(),
        });
    }
    let io_err = |source| DatasetError::Io {
        path: root.to_path_buf(),
        source,
    };
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    if dirs.is_empty() {
        dirs.push(root.to_path_buf());
    }
    Ok(dirs)
}

/// A bare implant list, or an object with an `implants` list. A payload of
/// either shape with a bad record is an error; any other document is logged
/// and read as no implants.
fn load_ground_truth(path: &Path) -> Result<Vec<Implant>, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let invalid = |e: serde_json::Error| DatasetError::GroundTruth {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let list = match serde_json::from_str(&text).map_err(invalid)? {
        list @ Value::Array(_) => list,
        Value::Object(mut fields) if fields.contains_key("implants") => {
            fields.remove("implants").unwrap_or(Value::Null)
        }
        _ => {
            warn!(path = %path.display(), "ground truth has no implant list");
            return Ok(Vec::new());
        }
    };
    serde_json::from_value(list).map_err(invalid)
}

/// Directory name, resolving `.`-style paths through the filesystem.
fn case_id(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            dir.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_default()
}

/// Sorted names of the regular files in `dir`, hidden files excluded.
fn file_names(dir: &Path) -> Result<Vec<String>, DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// First name matching the earliest pattern that matches anything.
fn first_match<'a>(names: &'a [String], patterns: &[&str]) -> Option<&'a str> {
    patterns.iter().find_map(|pattern| {
        names
            .iter()
            .find(|name| wildcard_match(pattern, name))
            .map(String::as_str)
    })
}

/// Case-sensitive match where `*` stands for any run of characters.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();
    let (mut pi, mut ni) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ni < n.len() {
        if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ni));
            pi += 1;
        } else if pi < p.len() && p[pi] == n[ni] {
            pi += 1;
            ni += 1;
        } else if let Some((sp, sn)) = star {
            pi = sp + 1;
            ni = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '*')
}
