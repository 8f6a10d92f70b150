use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gazept_core::{DataLogDto, TestTrialDto};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Everything a session produced, ready to be persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub trials: Vec<TestTrialDto>,
    pub logs: Vec<DataLogDto>,
}

pub fn write_json<W: Write>(writer: W, export: &SessionExport) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, export)?;
    Ok(())
}

pub fn write_json_file(path: impl AsRef<Path>, export: &SessionExport) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, export)?;
    writer.flush()?;
    Ok(())
}

/// The csv serializer only emits a header alongside the first record, so an
/// empty table gets its header written by hand.
fn write_rows<W: Write, T: Serialize>(
    writer: W,
    header: &[&str],
    rows: &[T],
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv.write_record(header)?;
    }
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_trials_csv<W: Write>(writer: W, trials: &[TestTrialDto]) -> Result<(), ExportError> {
    write_rows(writer, &TestTrialDto::FIELDS, trials)
}

pub fn write_logs_csv<W: Write>(writer: W, logs: &[DataLogDto]) -> Result<(), ExportError> {
    write_rows(writer, &DataLogDto::FIELDS, logs)
}

/// Writes `<stem>_trials.csv` and `<stem>_logs.csv` into `dir`
pub fn write_csv_files(
    dir: impl AsRef<Path>,
    stem: &str,
    export: &SessionExport,
) -> Result<(PathBuf, PathBuf), ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let trials_path = dir.join(format!("{stem}_trials.csv"));
    let logs_path = dir.join(format!("{stem}_logs.csv"));

    write_trials_csv(BufWriter::new(File::create(&trials_path)?), &export.trials)?;
    write_logs_csv(BufWriter::new(File::create(&logs_path)?), &export.logs)?;

    Ok((trials_path, logs_path))
}
