use crate::exif_reader::resolve_capture_timestamp;
use crate::planner::{plan_target, resolve_collision, OrganizeConfig};
use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SKIP_NO_EXIF: &str = "no EXIF datetime";
pub const SKIP_IN_PLACE: &str = "already in place";

/// Outcome for one visited file, emitted through the run callback. The
/// engine does not keep these; the caller owns display and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Skipped { path: PathBuf, reason: String },
    Planned { source: PathBuf, target: PathBuf },
    Moved { source: PathBuf, target: PathBuf },
    Failed { source: PathBuf, error: String },
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Skipped { path, reason } => {
                write!(f, "Skipping ({}): {}", reason, path.display())
            }
            FileOutcome::Planned { source, target } => {
                write!(
                    f,
                    "[DRY-RUN] Would move: {} -> {}",
                    source.display(),
                    target.display()
                )
            }
            FileOutcome::Moved { source, target } => {
                write!(f, "Moved: {} -> {}", source.display(), target.display())
            }
            FileOutcome::Failed { source, error } => {
                write!(f, "Skipping {}: {}", source.display(), error)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct RunStats {
    pub visited: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub planned: usize,
    pub moved: usize,
    pub failed: usize,
}

/// Walks the source tree and renames/relocates every file that yields an
/// EXIF capture timestamp, or simulates it under `dry_run`. One callback
/// invocation per visited file, strictly sequential, in tree-walk order.
/// Per-file failures degrade to outcomes; only an unenumerable source root
/// aborts, before any callback fires.
pub fn run(config: &OrganizeConfig, log: &mut dyn FnMut(FileOutcome)) -> Result<RunStats> {
    if !config.source_root.is_dir() {
        anyhow::bail!(
            "source folder does not exist: {}",
            config.source_root.display()
        );
    }

    let mut stats = RunStats::default();
    // Targets handed out earlier in this run; keeps dry-run previews and real
    // runs resolving collisions identically when two files want the same path.
    let mut claimed = HashSet::new();

    for entry in WalkDir::new(&config.source_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| config.source_root.clone());
                stats.failed += 1;
                log(FileOutcome::Failed {
                    source: path,
                    error: err.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let source = entry.into_path();
        stats.visited += 1;

        let Some(ts) = resolve_capture_timestamp(&source) else {
            stats.skipped += 1;
            log(FileOutcome::Skipped {
                path: source,
                reason: SKIP_NO_EXIF.to_string(),
            });
            continue;
        };

        let plan = plan_target(&source, &ts, config);
        let target = resolve_collision(
            &plan.target_dir.join(&plan.target_name),
            &source,
            &mut claimed,
        );

        // Rename and organize both land the file where it already is; renaming
        // a file onto itself is not a move and must not be reported as one.
        if target == source {
            stats.unchanged += 1;
            log(FileOutcome::Skipped {
                path: source,
                reason: SKIP_IN_PLACE.to_string(),
            });
            continue;
        }

        if config.dry_run {
            stats.planned += 1;
            log(FileOutcome::Planned { source, target });
            continue;
        }

        match move_file(&source, &plan.target_dir, &target) {
            Ok(()) => {
                stats.moved += 1;
                log(FileOutcome::Moved { source, target });
            }
            Err(err) => {
                stats.failed += 1;
                log(FileOutcome::Failed {
                    source,
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(stats)
}

// Rename semantics only; a file is never copied.
fn move_file(source: &Path, target_dir: &Path, target: &Path) -> std::io::Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::rename(source, target)
}
