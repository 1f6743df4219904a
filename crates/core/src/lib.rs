mod config;
mod exif_reader;
mod pattern;
mod planner;
mod runner;
#[cfg(test)]
mod testutil;

pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use exif_reader::{resolve_capture_timestamp, CaptureTimestamp};
pub use pattern::{
    filename_pattern_help, folder_pattern_help, generate_filename, generate_folder_path,
    validate_pattern, PatternError, PatternKind, DEFAULT_FILENAME_PATTERN, DEFAULT_FOLDER_PATTERN,
    FILENAME_PRESETS, FOLDER_PRESETS,
};
pub use planner::{plan_target, resolve_collision, MovePlan, OrganizeConfig};
pub use runner::{run, FileOutcome, RunStats, SKIP_IN_PLACE, SKIP_NO_EXIF};
