//! CSV export of the jobs currently on screen.
//!
//! The file is written to a temporary file next to the destination and
//! persisted in one step. Dropping the writer before `finish()` removes the
//! temporary file.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::Writer;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::AppError;
use crate::models::Job;

/// Column headers of an export, in order.
pub const EXPORT_HEADERS: [&str; 8] = [
    "Title",
    "Company",
    "Job Type",
    "Location",
    "Status",
    "Published Date",
    "Link",
    "Description",
];

/// File name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("jobs-export-{}.csv", date.format("%Y-%m-%d"))
}

/// Writes `jobs` to `dir/jobs-export-YYYY-MM-DD.csv`, replacing any file of
/// the same name. Returns the written path.
pub fn export_jobs_csv(jobs: &[Job], dir: &Path, date: NaiveDate) -> Result<PathBuf, AppError> {
    let path = dir.join(export_file_name(date));
    let mut writer = ExportWriter::new(&path)?;

    writer.write_row(EXPORT_HEADERS)?;
    for job in jobs {
        writer.write_row(job_record(job))?;
    }

    let path = writer.finish()?;
    info!("[EXPORT] wrote {} jobs to {}", jobs.len(), path.display());
    Ok(path)
}

fn job_record(job: &Job) -> [String; 8] {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        job.title.clone(),
        text(&job.company),
        text(&job.job_type),
        text(&job.job_location),
        job.status.as_str().to_string(),
        job.published_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        text(&job.link),
        flatten_lines(job.description.as_deref().unwrap_or_default()),
    ]
}

/// Collapses line breaks so each job stays on one physical line.
fn flatten_lines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// CSV writer over a temp file persisted on `finish()`.
struct ExportWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
}

impl ExportWriter {
    fn new(final_path: &Path) -> Result<Self, AppError> {
        let parent = final_path.parent().ok_or_else(|| {
            AppError::Io(format!(
                "Cannot determine parent directory for: {}",
                final_path.display()
            ))
        })?;

        let temp = NamedTempFile::new_in(parent)
            .map_err(|e| AppError::Io(format!("Failed to create temporary file: {}", e)))?;

        Ok(Self {
            writer: Writer::from_writer(BufWriter::new(temp)),
            final_path: final_path.to_path_buf(),
        })
    }

    fn write_row<I, T>(&mut self, record: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(record).map_err(AppError::from)
    }

    fn finish(self) -> Result<PathBuf, AppError> {
        let buffered = self
            .writer
            .into_inner()
            .map_err(|e| AppError::Io(format!("Failed to flush export: {}", e.error())))?;

        let temp = buffered
            .into_inner()
            .map_err(|e| AppError::Io(format!("Failed to flush export: {}", e.error())))?;

        temp.persist(&self.final_path).map_err(|e| {
            AppError::Io(format!(
                "Failed to write {}: {}",
                self.final_path.display(),
                e.error
            ))
        })?;

        Ok(self.final_path)
    }
}
