//! JSON file output shared by the ETL load step and the webhook journal

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

/// Serialize `data` as a 4-space indented JSON document, replacing `path`.
///
/// Non-ASCII text is written as-is (UTF-8). Creates the parent directory.
pub fn write_pretty<T: Serialize + ?Sized>(data: &T, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    data.serialize(&mut ser)?;
    writer.flush()
}
