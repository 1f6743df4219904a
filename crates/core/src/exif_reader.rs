use anyhow::Result;
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Capture moment of a photo, resolved once from its EXIF block.
/// `millis` is kept as the 3-digit string the SubSec tag produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureTimestamp {
    pub taken: NaiveDateTime,
    pub millis: String,
}

/// Best-effort capture timestamp for a file. Fallback order is
/// DateTimeOriginal, DateTimeDigitized, DateTime, each paired with its
/// SubSec tag. Unreadable files, files without EXIF and unparsable date
/// strings all resolve to `None`; nothing propagates past this boundary.
pub fn resolve_capture_timestamp(path: &Path) -> Option<CaptureTimestamp> {
    read_timestamp(path).ok().flatten()
}

fn read_timestamp(path: &Path) -> Result<Option<CaptureTimestamp>> {
    let file = File::open(path)?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut buf)?;

    let fallback_order = [
        (Tag::DateTimeOriginal, Tag::SubSecTimeOriginal),
        (Tag::DateTimeDigitized, Tag::SubSecTimeDigitized),
        (Tag::DateTime, Tag::SubSecTime),
    ];

    for (date_tag, subsec_tag) in fallback_order {
        let Some(raw) = ascii_field(&exif, date_tag) else {
            continue;
        };

        // The chosen tag is authoritative. A malformed value means the file
        // is unresolved, not that the next tag gets a try.
        let Ok(taken) = NaiveDateTime::parse_from_str(&raw, EXIF_DATETIME_FORMAT) else {
            return Ok(None);
        };

        let millis = ascii_field(&exif, subsec_tag)
            .map(|subsec| subsec_to_millis(&subsec))
            .unwrap_or_else(|| "000".to_string());

        return Ok(Some(CaptureTimestamp { taken, millis }));
    }

    Ok(None)
}

fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(lines) => {
            let text = std::str::from_utf8(lines.first()?).ok()?.trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

// SubSec values are free-length digit strings; pad with leading zeros to
// three digits, truncate anything longer.
fn subsec_to_millis(subsec: &str) -> String {
    let padded = format!("{subsec:0>3}");
    padded.chars().take(3).collect()
}
