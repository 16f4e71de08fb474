//! Schedule artifact export.
//!
//! `export(result, base)` writes two views of the same result:
//!
//! - `<base>.json`: the full [`ScheduleResult`] record
//! - `<base>.csv`: one row per entry, sorted by machine then start
//!
//! Each file is written to a `.tmp` sibling and renamed into place, so a
//! reader never sees a half-written artifact.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::ScheduleResult;
use crate::error::ExportError;

/// Paths of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    scenario_id: &'a str,
    order_id: &'a str,
    machine_id: &'a str,
    item_id: &'a str,
    start: i64,
    end: i64,
    setup_minutes: i64,
    process_minutes: i64,
    due: i64,
    tardiness: i64,
    sequence: u64,
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `bytes` to `path` through a temporary sibling.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let tmp = with_suffix(path, ".tmp");
    {
        let file = File::create(&tmp).map_err(io_error(&tmp))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes).map_err(io_error(&tmp))?;
        writer.flush().map_err(io_error(&tmp))?;
    }
    fs::rename(&tmp, path).map_err(io_error(path))
}

/// A failed flush of the CSV buffer, as a CSV error.
fn flush_error(source: &std::io::Error) -> ExportError {
    let source = std::io::Error::new(source.kind(), source.to_string());
    ExportError::Csv(csv::Error::from(source))
}

fn csv_bytes(result: &ScheduleResult) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for e in result.entries() {
        wtr.serialize(CsvRow {
            scenario_id: &result.scenario_id,
            order_id: e.order_id(),
            machine_id: e.machine_id(),
            item_id: e.item_id(),
            start: e.start(),
            end: e.end(),
            setup_minutes: e.setup_minutes(),
            process_minutes: e.process_minutes(),
            due: e.due(),
            tardiness: e.tardiness(),
            sequence: e.sequence(),
        })?;
    }
    wtr.into_inner().map_err(|e| flush_error(e.error()))
}

/// Writes `<base>.json` and `<base>.csv` for a result.
///
/// Both payloads are serialized before anything touches the disk.
pub fn export(result: &ScheduleResult, base: &Path) -> Result<ExportPaths, ExportError> {
    let json = serde_json::to_vec_pretty(result)?;
    let csv = csv_bytes(result)?;

    if let Some(dir) = base.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_error(dir))?;
    }

    let paths = ExportPaths {
        json: with_suffix(base, ".json"),
        csv: with_suffix(base, ".csv"),
    };
    write_atomic(&paths.json, &json)?;
    write_atomic(&paths.csv, &csv)?;

    info!(
        scenario = %result.scenario_id,
        json = %paths.json.display(),
        csv = %paths.csv.display(),
        entries = result.schedule.len(),
        "schedule exported"
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_keeps_dots() {
        let p = with_suffix(Path::new("out/run.v1"), ".json");
        assert_eq!(p, PathBuf::from("out/run.v1.json"));
    }

    #[test]
    fn test_flush_failure_is_csv_error() {
        let source = std::io::Error::new(std::io::ErrorKind::WriteZero, "buffer full");
        let inner = match flush_error(&source) {
            ExportError::Csv(inner) => inner,
            other => panic!("expected a csv error, got {other:?}"),
        };
        match inner.kind() {
            csv::ErrorKind::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::WriteZero),
            other => panic!("unexpected csv error kind {other:?}"),
        }
        assert!(inner.to_string().contains("buffer full"));
    }
}
