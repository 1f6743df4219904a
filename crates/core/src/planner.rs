use crate::exif_reader::CaptureTimestamp;
use crate::pattern::{
    generate_filename, generate_folder_path, DEFAULT_FILENAME_PATTERN, DEFAULT_FOLDER_PATTERN,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Parameters for one organize run. Built by the caller, immutable for the
/// run's duration; the engine never reaches into ambient settings.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub rename_enabled: bool,
    pub organize_enabled: bool,
    pub dry_run: bool,
    pub filename_pattern: String,
    pub folder_pattern: String,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::new(),
            destination_root: PathBuf::new(),
            rename_enabled: true,
            organize_enabled: true,
            dry_run: true,
            filename_pattern: DEFAULT_FILENAME_PATTERN.to_string(),
            folder_pattern: DEFAULT_FOLDER_PATTERN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub target_dir: PathBuf,
    pub target_name: String,
}

/// Computes where a file should end up, before collision resolution.
/// Rename off keeps the original name; organize off keeps the original
/// parent directory (a rename-only, no-move operation).
pub fn plan_target(source: &Path, ts: &CaptureTimestamp, config: &OrganizeConfig) -> MovePlan {
    let target_name = if config.rename_enabled {
        let extension = source
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        generate_filename(ts, &extension, &config.filename_pattern)
    } else {
        source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string())
    };

    let target_dir = if config.organize_enabled {
        config
            .destination_root
            .join(generate_folder_path(ts, &config.folder_pattern))
    } else {
        source.parent().unwrap_or_else(|| Path::new(".")).to_path_buf()
    };

    MovePlan {
        target_dir,
        target_name,
    }
}

/// Appends " (1)", " (2)", ... before the extension until the path is free.
/// A path is taken when it exists on disk or when an earlier plan in the same
/// run already claimed it, so dry runs and real runs make the same decision;
/// the file's own current path counts as free. The chosen path is recorded in
/// `claimed` before returning.
pub fn resolve_collision(
    candidate: &Path,
    source: &Path,
    claimed: &mut HashSet<PathBuf>,
) -> PathBuf {
    if is_available(candidate, source, claimed) {
        claimed.insert(candidate.to_path_buf());
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new("."));
    let stem = candidate
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    let extension = candidate
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut n = 1usize;
    loop {
        let mut name = format!("{stem} ({n})");
        if !extension.is_empty() {
            name.push('.');
            name.push_str(&extension);
        }
        let next = parent.join(name);
        if is_available(&next, source, claimed) {
            claimed.insert(next.clone());
            return next;
        }
        n += 1;
    }
}

fn is_available(candidate: &Path, source: &Path, claimed: &HashSet<PathBuf>) -> bool {
    if claimed.contains(candidate) {
        return false;
    }
    candidate == source || !candidate.exists()
}
