//! Whole-file CSV tables.
//!
//! Tables are read in full and rewritten in full. Writes go to a temporary
//! file in the same directory which is then renamed over the target, so a
//! concurrent reader sees either the previous table or the new one.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use stockroom_core::{StockroomError, StockroomResult};

/// Read every row of `path`.
///
/// A missing file is an empty table. Columns are matched by header name;
/// unknown columns are ignored and missing ones fall back to the row type's
/// defaults.
pub fn read_rows<R>(path: &Path) -> StockroomResult<Vec<R>>
where
    R: DeserializeOwned,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(storage_error(path, err)),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(BufReader::new(file));

    reader
        .deserialize()
        .collect::<Result<Vec<R>, csv::Error>>()
        .map_err(|err| storage_error(path, err))
}

/// Replace `path` with a table made of `headers` followed by `rows`.
///
/// The header row is always written, so an empty table still carries its
/// column set.
pub fn write_rows<W>(path: &Path, headers: &[&str], rows: &[W]) -> StockroomResult<()>
where
    W: Serialize,
{
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|err| storage_error(dir, err))?;

    let tmp = NamedTempFile::new_in(dir).map_err(|err| storage_error(dir, err))?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file());
        writer.write_record(headers).map_err(|err| storage_error(path, err))?;
        for row in rows {
            writer.serialize(row).map_err(|err| storage_error(path, err))?;
        }
        writer.flush().map_err(|err| storage_error(path, err))?;
    }
    tmp.as_file().sync_all().map_err(|err| storage_error(path, err))?;

    tmp.persist(path).map_err(|err| storage_error(path, err.error))?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "table written");
    Ok(())
}

fn storage_error(path: &Path, err: impl core::fmt::Display) -> StockroomError {
    StockroomError::storage(format!("{}: {err}", path.display()))
}
