//! Test-only helpers for producing files with real EXIF blocks.

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Writes a minimal TIFF file carrying the given ASCII EXIF fields. The
/// reader accepts TIFF containers, which keeps fixtures free of JPEG
/// scaffolding.
pub(crate) fn write_exif_file(path: &Path, dates: &[(Tag, &str)], subsecs: &[(Tag, &str)]) {
    let mut fields = Vec::new();
    for (tag, value) in dates.iter().chain(subsecs) {
        fields.push(Field {
            tag: *tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        });
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }

    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).expect("serialize EXIF");
    fs::write(path, buf.into_inner()).expect("write EXIF fixture");
}
