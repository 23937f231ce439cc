//! # Result Writer
//!
//! Episode records are appended to one of two semicolon-separated files:
//! dated episodes go to `episode_data.csv`, everything else to
//! `errors_while_parsing.csv`. Each file starts with a UTF-8 byte-order mark
//! and a header row written when the file is created.
//!
//! Files are opened, appended to and closed for every record, so rows that
//! were written survive a crash of the run.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error as CrateError;
use crate::extraction::{DateLabel, DateRange};

/// File receiving episodes with a valid start year
pub const DATED_FILE_NAME: &str = "episode_data.csv";

/// File receiving every other episode
pub const ERROR_FILE_NAME: &str = "errors_while_parsing.csv";

/// Column names, in row order
pub const HEADER: [&str; 5] = ["title", "summary", "year_from", "year_until", "url"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub title: String,
    pub summary: String,
    pub year_from: DateLabel,
    pub year_until: DateLabel,
    pub url: String,
}

impl EpisodeRecord {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        range: DateRange,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            year_from: range.start,
            year_until: range.end,
            url: url.into(),
        }
    }

    /// A record without dates, for episodes whose page could not be read
    pub fn undated(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(title, String::new(), DateRange::unknown(), url)
    }

    /// Dated records go to the success file
    pub fn is_dated(&self) -> bool {
        self.year_from.is_year()
    }

    fn fields(&self) -> [&str; 5] {
        [
            &self.title,
            &self.summary,
            self.year_from.as_str(),
            self.year_until.as_str(),
            &self.url,
        ]
    }
}

/// Which file a record ended up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Dated,
    Errors,
}

/// Error type for result files
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<WriteError> for CrateError {
    fn from(err: WriteError) -> Self {
        CrateError::Write(err.to_string())
    }
}

/// Appends episode records to the success and error files of an output directory
#[derive(Debug, Clone)]
pub struct ResultWriter {
    dated_path: PathBuf,
    error_path: PathBuf,
}

impl ResultWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        let output_dir = output_dir.as_ref();
        Self {
            dated_path: output_dir.join(DATED_FILE_NAME),
            error_path: output_dir.join(ERROR_FILE_NAME),
        }
    }

    pub fn dated_path(&self) -> &Path {
        &self.dated_path
    }

    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    /// Append `record` to the file matching its dates
    pub fn write(&self, record: &EpisodeRecord) -> Result<Destination, WriteError> {
        let (path, destination) = if record.is_dated() {
            (&self.dated_path, Destination::Dated)
        } else {
            (&self.error_path, Destination::Errors)
        };
        append_record(path, record)?;
        debug!(path = %path.display(), ?destination, "Wrote episode record");
        Ok(destination)
    }
}

fn append_record(path: &Path, record: &EpisodeRecord) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_new = file.metadata()?.len() == 0;
    if is_new {
        file.write_all(UTF8_BOM)?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Necessary)
        .has_headers(false)
        .from_writer(file);
    if is_new {
        writer.write_record(HEADER)?;
    }
    writer.write_record(record.fields())?;
    writer.flush()?;
    Ok(())
}
