//! CSV dataset reader.
//!
//! Reads a vacancy export, skips incomplete rows and cleans every field
//! before building typed records.

use crate::clean::clean_field;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vacancy_core::config::IngestionConfig;
use vacancy_core::{Error, Result, SalaryRange, VacancyRecord};

/// Columns a vacancy export must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "salary_from",
    "salary_to",
    "salary_currency",
    "area_name",
    "published_at",
];

/// Records read from one CSV file.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Source file.
    pub path: PathBuf,
    /// Parsed records, in file order.
    pub records: Vec<VacancyRecord>,
    /// Rows dropped as incomplete.
    pub skipped_rows: u64,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Positions of the required columns within the header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    salary_from: usize,
    salary_to: usize,
    salary_currency: usize,
    area_name: usize,
    published_at: usize,
}

impl ColumnIndex {
    fn resolve(header: &[String], source: &Path) -> Result<Self> {
        let find = |column: &str| {
            header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| Error::missing_column(column, source))
        };

        Ok(Self {
            name: find("name")?,
            salary_from: find("salary_from")?,
            salary_to: find("salary_to")?,
            salary_currency: find("salary_currency")?,
            area_name: find("area_name")?,
            published_at: find("published_at")?,
        })
    }

    fn record(&self, fields: &[String]) -> Result<VacancyRecord> {
        Ok(VacancyRecord {
            name: fields[self.name].clone(),
            salary: SalaryRange::new(
                parse_amount("salary_from", &fields[self.salary_from])?,
                parse_amount("salary_to", &fields[self.salary_to])?,
                fields[self.salary_currency].clone(),
            ),
            area_name: fields[self.area_name].clone(),
            published_at: fields[self.published_at].clone(),
        })
    }
}

fn parse_amount(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::invalid_number(field, value))
}

/// Strip a UTF-8 byte order mark from the first header cell.
pub(crate) fn header_names(record: &csv::StringRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect()
}

/// Reader for vacancy CSV exports.
#[derive(Debug, Clone)]
pub struct DatasetReader {
    skip_incomplete_rows: bool,
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new(&IngestionConfig::default())
    }
}

impl DatasetReader {
    /// Create a reader from configuration.
    pub fn new(config: &IngestionConfig) -> Self {
        Self {
            skip_incomplete_rows: config.skip_incomplete_rows,
        }
    }

    /// Read a dataset from a file on disk.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.read_from(file, path)
    }

    /// Read a dataset from any reader; `source` names it in errors and logs.
    pub fn read_from<R: Read>(&self, reader: R, source: &Path) -> Result<Dataset> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = csv_reader.records();

        let header = match rows.next() {
            Some(record) => header_names(&record?),
            None => {
                return Err(Error::empty_input(format!(
                    "{} has no header row",
                    source.display()
                )))
            }
        };
        let columns = ColumnIndex::resolve(&header, source)?;

        let mut records = Vec::new();
        let mut skipped_rows = 0u64;

        for row in rows {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            if row.len() != header.len() || row.iter().any(str::is_empty) {
                if !self.skip_incomplete_rows {
                    return Err(Error::MalformedRow {
                        line,
                        reason: format!(
                            "expected {} non-empty fields, got {}",
                            header.len(),
                            row.len()
                        ),
                    });
                }
                debug!(line, "skipping incomplete row");
                skipped_rows += 1;
                continue;
            }

            let fields: Vec<String> = row.iter().map(clean_field).collect();
            records.push(columns.record(&fields)?);
        }

        info!(
            path = %source.display(),
            records = records.len(),
            skipped_rows,
            "dataset loaded"
        );

        Ok(Dataset {
            path: source.to_path_buf(),
            records,
            skipped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "name,salary_from,salary_to,salary_currency,area_name,published_at";

    fn read(content: &str) -> Result<Dataset> {
        DatasetReader::default().read_from(content.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_reads_records() {
        let csv = format!(
            "{HEADER}\n\
             Программист,10000,20000,RUR,Москва,2022-07-05T18:19:30+0300\n\
             \"<b>Data</b>  Analyst\",1000.5,2000,USD,Санкт-Петербург,2021-01-01T00:00:00+0300\n"
        );
        let dataset = read(&csv).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.skipped_rows, 0);
        assert_eq!(dataset.records[0].name, "Программист");
        assert_eq!(dataset.records[0].salary, SalaryRange::new(10000.0, 20000.0, "RUR"));
        assert_eq!(dataset.records[1].name, "Data Analyst");
        assert_eq!(dataset.records[1].salary.from, 1000.5);
        assert_eq!(dataset.records[1].area_name, "Санкт-Петербург");
    }

    #[test]
    fn test_skips_incomplete_rows() {
        let csv = format!(
            "{HEADER}\n\
             Программист,,20000,RUR,Москва,2022-07-05\n\
             Программист,10000,20000,RUR,Москва\n\
             Тестировщик,10000,20000,RUR,Казань,2022-07-05\n"
        );
        let dataset = read(&csv).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped_rows, 2);
        assert_eq!(dataset.records[0].area_name, "Казань");
    }

    #[test]
    fn test_strict_mode_rejects_incomplete_rows() {
        let reader = DatasetReader::new(&IngestionConfig {
            skip_incomplete_rows: false,
        });
        let csv = format!("{HEADER}\nПрограммист,,20000,RUR,Москва,2022-07-05\n");
        let err = reader
            .read_from(csv.as_bytes(), Path::new("strict.csv"))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(read(""), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let dataset = read(&format!("{HEADER}\n")).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let err = read("name,salary_from,salary_to\nA,1,2\n").unwrap_err();
        match err {
            Error::MissingColumn { column, .. } => assert_eq!(column, "salary_currency"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_number() {
        let csv = format!("{HEADER}\nПрограммист,много,20000,RUR,Москва,2022-07-05\n");
        assert!(matches!(read(&csv), Err(Error::InvalidNumber { .. })));
    }

    #[test]
    fn test_bom_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "\u{feff}{HEADER}\nПрограммист,1,3,RUR,Москва,2022-07-05\n"
        )
        .unwrap();

        let dataset = DatasetReader::default().read_path(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.path, file.path());
    }

    #[test]
    fn test_multiline_field() {
        let csv = format!(
            "{HEADER}\n\"Senior\r\n  Rust <i>developer</i>\",1,3,RUR,Москва,2022-07-05\n"
        );
        let dataset = read(&csv).unwrap();
        assert_eq!(dataset.records[0].name, "Senior\nRust developer");
    }
}
