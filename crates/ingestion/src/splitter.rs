//! Split a vacancy export into per-year files.
//!
//! Produces `<out_dir>/<YYYY>.csv`, each carrying the original header and
//! the raw rows published in that year.

use crate::reader::header_names;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;
use vacancy_core::{year_of, Error, Result, Year};

/// Split `input` by the year prefix of `published_at`.
///
/// Returns the written files in ascending year order.
pub fn split_by_year(input: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    let out_dir = out_dir.as_ref();

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(input)?;
    let mut rows = csv_reader.records();

    let header = match rows.next() {
        Some(record) => header_names(&record?),
        None => {
            return Err(Error::empty_input(format!(
                "{} has no header row",
                input.display()
            )))
        }
    };
    let date_idx = header
        .iter()
        .position(|h| h == "published_at")
        .ok_or_else(|| Error::missing_column("published_at", input))?;

    fs::create_dir_all(out_dir)?;

    let mut writers: BTreeMap<Year, csv::Writer<File>> = BTreeMap::new();
    let mut rows_written = 0u64;

    for row in rows {
        let row = row?;
        let published_at = row.get(date_idx).ok_or_else(|| Error::MalformedRow {
            line: row.position().map(|p| p.line()).unwrap_or_default(),
            reason: "row has no published_at field".to_string(),
        })?;
        let year = year_of(published_at)?;

        let writer = match writers.entry(year) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut writer = csv::WriterBuilder::new()
                    .flexible(true)
                    .from_path(out_dir.join(format!("{year}.csv")))?;
                writer.write_record(&header)?;
                entry.insert(writer)
            }
        };
        writer.write_record(&row)?;
        rows_written += 1;
    }

    let mut paths = Vec::with_capacity(writers.len());
    for (year, mut writer) in writers {
        writer.flush()?;
        paths.push(out_dir.join(format!("{year}.csv")));
    }

    info!(
        input = %input.display(),
        files = paths.len(),
        rows = rows_written,
        "export split by year"
    );

    Ok(paths)
}
