use crate::exif_reader::CaptureTimestamp;
use chrono::{Datelike, Timelike};
use std::cmp::Reverse;
use thiserror::Error;

pub const DEFAULT_FILENAME_PATTERN: &str = "YYYYMMDD-HHmmss-MS";
pub const DEFAULT_FOLDER_PATTERN: &str = "YYYY/MM-Month";

pub const FILENAME_PRESETS: [&str; 6] = [
    "YYYYMMDD-HHmmss-MS",
    "YYYYMMDDHHmmss_MS",
    "YYYY-MM-DD_HH.mm.ss",
    "YYYYMMDD_HHmmss",
    "IMG_YYYYMMDD_HHmmss",
    "Photo_YYYY-MM-DD",
];

pub const FOLDER_PRESETS: [&str; 7] = [
    "YYYY/MM",
    "YYYY/MM-DD",
    "YYYY/MM-Month",
    "YYYY/MM Month",
    "YYYY/Month",
    "YYYY/MM-Month YYYY",
    "Photos/YYYY/MM",
];

const FILENAME_TOKENS: [&str; 9] = ["YYYY", "YY", "MM", "DD", "HH", "mm", "ss", "MS", "ext"];
const FOLDER_TOKENS: [&str; 6] = ["YYYY", "YY", "MM", "DD", "Month", "Mon"];

// Literal words appearing in the shipped presets; accepted during validation
// so that e.g. "IMG_YYYYMMDD" passes while a stray word is rejected.
const LITERAL_WORDS: [&str; 3] = ["IMG", "Photo", "Photos"];

const RESERVED_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Filename,
    Folder,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern cannot be empty")]
    Empty,
    #[error("pattern contains invalid character: {0}")]
    InvalidCharacter(char),
    #[error("invalid tokens: {0}")]
    InvalidTokens(String),
}

/// Builds a file name from a pattern. Tokens: YYYY, YY, MM, DD, HH, mm, ss,
/// MS (the resolver's 3-digit millisecond string) and ext. When the pattern
/// does not use the ext token, the extension is appended as-is.
pub fn generate_filename(ts: &CaptureTimestamp, extension: &str, pattern: &str) -> String {
    let replacements = [
        ("YYYY", format!("{:04}", ts.taken.year())),
        ("YY", format!("{:02}", ts.taken.year() % 100)),
        ("MM", format!("{:02}", ts.taken.month())),
        ("DD", format!("{:02}", ts.taken.day())),
        ("HH", format!("{:02}", ts.taken.hour())),
        ("mm", format!("{:02}", ts.taken.minute())),
        ("ss", format!("{:02}", ts.taken.second())),
        ("MS", ts.millis.clone()),
        ("ext", extension.to_string()),
    ];

    let mut result = substitute(pattern, &replacements);
    if !pattern.contains("ext") && !extension.is_empty() {
        result.push_str(extension);
    }
    result
}

/// Builds a folder path from a pattern. Tokens: YYYY, YY, MM, DD,
/// Month (full month name) and Mon (3-letter abbreviation).
pub fn generate_folder_path(ts: &CaptureTimestamp, pattern: &str) -> String {
    let replacements = [
        ("Month", ts.taken.format("%B").to_string()),
        ("YYYY", format!("{:04}", ts.taken.year())),
        ("YY", format!("{:02}", ts.taken.year() % 100)),
        ("MM", format!("{:02}", ts.taken.month())),
        ("DD", format!("{:02}", ts.taken.day())),
        ("Mon", ts.taken.format("%b").to_string()),
    ];

    substitute(pattern, &replacements)
}

// Longest token first, all occurrences, so that YY never clobbers part of a
// YYYY that has not been substituted yet.
fn substitute(pattern: &str, replacements: &[(&str, String)]) -> String {
    let mut ordered: Vec<&(&str, String)> = replacements.iter().collect();
    ordered.sort_by_key(|(token, _)| Reverse(token.len()));

    let mut result = pattern.to_string();
    for (token, value) in ordered {
        result = result.replace(token, value);
    }
    result
}

pub fn validate_pattern(pattern: &str, kind: PatternKind) -> Result<(), PatternError> {
    if pattern.trim().is_empty() {
        return Err(PatternError::Empty);
    }

    for ch in pattern.chars() {
        if RESERVED_CHARS.contains(&ch) {
            return Err(PatternError::InvalidCharacter(ch));
        }
        // TODO: decide whether '/' should be allowed in folder patterns;
        // every folder preset uses it as a separator yet it is rejected here.
        if kind == PatternKind::Folder && ch == '/' {
            return Err(PatternError::InvalidCharacter(ch));
        }
    }

    let tokens: &[&str] = match kind {
        PatternKind::Filename => &FILENAME_TOKENS,
        PatternKind::Folder => &FOLDER_TOKENS,
    };

    let invalid: Vec<&str> = alpha_runs(pattern)
        .into_iter()
        .filter(|&run| !LITERAL_WORDS.contains(&run) && !is_token_run(run, tokens))
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(PatternError::InvalidTokens(invalid.join(", ")))
    }
}

pub fn filename_pattern_help() -> &'static str {
    "Available filename tokens:
  YYYY - 4-digit year (2025)
  YY   - 2-digit year (25)
  MM   - 2-digit month (01-12)
  DD   - 2-digit day (01-31)
  HH   - 2-digit hour (00-23)
  mm   - 2-digit minute (00-59)
  ss   - 2-digit second (00-59)
  MS   - milliseconds (000-999)
  ext  - file extension (.jpg)

Examples:
  YYYYMMDD-HHmmss-MS  -> 20250115-143025-123.jpg
  YYYY-MM-DD_HH.mm.ss -> 2025-01-15_14.30.25.jpg
  IMG_YYYYMMDD_HHmmss -> IMG_20250115_143025.jpg"
}

pub fn folder_pattern_help() -> &'static str {
    "Available folder tokens:
  YYYY  - 4-digit year (2025)
  YY    - 2-digit year (25)
  MM    - 2-digit month (01-12)
  DD    - 2-digit day (01-31)
  Month - full month name (January)
  Mon   - 3-letter month (Jan)

Examples:
  YYYY/MM        -> 2025/01
  YYYY/MM-Month  -> 2025/01-January
  YYYY/MM Month  -> 2025/01 January
  Photos/YYYY/MM -> Photos/2025/01"
}

// Maximal runs of ASCII letters; everything else separates runs.
fn alpha_runs(pattern: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, ch) in pattern.char_indices() {
        if ch.is_ascii_alphabetic() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            runs.push(&pattern[s..i]);
        }
    }
    if let Some(s) = start {
        runs.push(&pattern[s..]);
    }
    runs
}

// A run like "YYYYMMDD" is valid when it decomposes into recognized tokens,
// matching greedily from the longest token down.
fn is_token_run(run: &str, tokens: &[&str]) -> bool {
    let mut by_len: Vec<&str> = tokens.to_vec();
    by_len.sort_by_key(|token| Reverse(token.len()));

    let mut rest = run;
    'scan: while !rest.is_empty() {
        for token in &by_len {
            if let Some(tail) = rest.strip_prefix(token) {
                rest = tail;
                continue 'scan;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, millis: &str) -> CaptureTimestamp {
        CaptureTimestamp {
            taken: NaiveDate::from_ymd_opt(y, mo, d)
                .expect("valid date")
                .and_hms_opt(h, mi, s)
                .expect("valid time"),
            millis: millis.to_string(),
        }
    }

    #[test]
    fn filename_default_pattern() {
        let name = generate_filename(
            &ts(2025, 1, 15, 14, 30, 25, "123"),
            ".jpg",
            "YYYYMMDD-HHmmss-MS",
        );
        assert_eq!(name, "20250115-143025-123.jpg");
    }

    #[test]
    fn filename_longest_token_wins() {
        let name = generate_filename(&ts(2025, 1, 15, 14, 30, 25, "000"), "", "YYYY-YY");
        assert_eq!(name, "2025-25");
    }

    #[test]
    fn filename_appends_extension_without_ext_token() {
        let name = generate_filename(&ts(2025, 1, 15, 14, 30, 25, "000"), ".jpg", "YYYYMMDD");
        assert_eq!(name, "20250115.jpg");
    }

    #[test]
    fn filename_places_ext_token() {
        let name = generate_filename(&ts(2025, 1, 15, 14, 30, 25, "000"), ".jpg", "YYYYMMDDext");
        assert_eq!(name, "20250115.jpg");
    }

    #[test]
    fn filename_millis_passed_through_verbatim() {
        let name = generate_filename(&ts(2025, 1, 15, 14, 30, 25, "007"), "", "MS");
        assert_eq!(name, "007");
    }

    #[test]
    fn filename_is_deterministic() {
        let stamp = ts(2025, 6, 1, 10, 0, 0, "500");
        let a = generate_filename(&stamp, ".jpg", "IMG_YYYYMMDD_HHmmss");
        let b = generate_filename(&stamp, ".jpg", "IMG_YYYYMMDD_HHmmss");
        assert_eq!(a, b);
        assert_eq!(a, "IMG_20250601_100000.jpg");
    }

    #[test]
    fn folder_month_names() {
        let path = generate_folder_path(&ts(2025, 1, 15, 0, 0, 0, "000"), "YYYY/MM-Month");
        assert_eq!(path, "2025/01-January");
    }

    #[test]
    fn folder_month_abbreviation() {
        let path = generate_folder_path(&ts(2025, 6, 1, 0, 0, 0, "000"), "Mon YYYY");
        assert_eq!(path, "Jun 2025");
    }

    #[test]
    fn validate_accepts_token_runs() {
        assert!(validate_pattern("IMG_YYYYMMDD", PatternKind::Filename).is_ok());
        assert!(validate_pattern("YYYYMMDD-HHmmss-MS", PatternKind::Filename).is_ok());
    }

    #[test]
    fn validate_rejects_unknown_word() {
        let err = validate_pattern("IMG_FOO", PatternKind::Filename).expect_err("must fail");
        match err {
            PatternError::InvalidTokens(tokens) => assert!(tokens.contains("FOO")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty() {
        assert_eq!(
            validate_pattern("   ", PatternKind::Filename),
            Err(PatternError::Empty)
        );
    }

    #[test]
    fn validate_rejects_reserved_characters() {
        assert_eq!(
            validate_pattern("YYYY?MM", PatternKind::Filename),
            Err(PatternError::InvalidCharacter('?'))
        );
    }

    #[test]
    fn validate_rejects_folder_tokens_in_filename() {
        let err = validate_pattern("YYYY-Month", PatternKind::Filename).expect_err("must fail");
        assert!(matches!(err, PatternError::InvalidTokens(_)));
    }

    // Documents the current rule rather than an agreed one: every shipped
    // folder preset uses '/' as a separator, yet folder validation rejects
    // the character. See the open-question entry in DESIGN.md.
    #[test]
    fn validate_folder_rejects_slash_as_written() {
        assert_eq!(
            validate_pattern("YYYY/MM", PatternKind::Folder),
            Err(PatternError::InvalidCharacter('/'))
        );
        assert!(validate_pattern("YYYY-MM-Month", PatternKind::Folder).is_ok());
    }

    #[test]
    fn validate_folder_rejects_filename_tokens() {
        let err = validate_pattern("HHmmss", PatternKind::Folder).expect_err("must fail");
        assert!(matches!(err, PatternError::InvalidTokens(_)));
    }
}
