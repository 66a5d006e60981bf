use anyhow::{bail, Context};
use domain::models::SupportRecord;
use shared::types::Result;
use shared::utils::content_fingerprint;
use std::path::{Path, PathBuf};

/// The corpus as read from disk, with the fingerprint of the exact bytes parsed.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    pub records: Vec<SupportRecord>,
    pub fingerprint: String,
}

/// Reads the example-response CSV. Each row becomes one record whose text is
/// `header: value` per column.
pub struct CorpusLoader {
    path: PathBuf,
}

impl CorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fingerprint(&self) -> Result<String> {
        let bytes = self.read_bytes()?;
        Ok(content_fingerprint(&bytes))
    }

    pub fn load(&self) -> Result<CorpusSnapshot> {
        let bytes = self.read_bytes()?;
        let records = parse_records(&bytes)
            .with_context(|| format!("parsing corpus {}", self.path.display()))?;
        if records.is_empty() {
            bail!("corpus {} has no records", self.path.display());
        }
        Ok(CorpusSnapshot {
            records,
            fingerprint: content_fingerprint(&bytes),
        })
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path)
            .with_context(|| format!("reading corpus {}", self.path.display()))
    }
}

fn parse_records(bytes: &[u8]) -> Result<Vec<SupportRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let row_values = result?;
        if row_values.iter().all(str::is_empty) {
            continue;
        }
        let content = headers
            .iter()
            .zip(row_values.iter())
            .map(|(header, value)| format!("{header}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        let position = records.len();
        records.push(SupportRecord {
            id: format!("row:{row}"),
            position,
            content,
        });
    }
    Ok(records)
}
