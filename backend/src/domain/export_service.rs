//! CSV report of the calculation history.
//!
//! The report is a verbatim projection of the store: header first, then one
//! line per record in insertion order, no filtering or sorting.

use csv::WriterBuilder;
use shared::ExportResponse;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{error, info};

use super::errors::{DeskError, DeskResult};
use crate::storage::CalculationStorage;

/// Report columns, in record field order
pub const EXPORT_HEADER: [&str; 6] = ["id", "timestamp", "a", "op", "b", "result"];

pub const DEFAULT_EXPORT_FILE: &str = "calculation_report.csv";

/// Export service that writes the history to CSV files
#[derive(Clone)]
pub struct ExportService {
    default_path: PathBuf,
}

impl ExportService {
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
        }
    }

    /// Pick the destination for a user-supplied path, falling back to the default
    pub fn resolve_destination(&self, requested: Option<&str>) -> PathBuf {
        match requested {
            Some(path) if !path.trim().is_empty() => PathBuf::from(sanitize_path(path)),
            _ => self.default_path.clone(),
        }
    }

    /// Write every stored record to `destination`, replacing any existing file
    pub async fn export_to_csv(
        &self,
        store: &dyn CalculationStorage,
        destination: &Path,
    ) -> DeskResult<ExportResponse> {
        info!("📄 EXPORT: Exporting calculation history to {}", destination.display());

        let records = store.fetch_all().await.map_err(|e| {
            error!("❌ EXPORT: Failed to read history: {}", e);
            DeskError::export(destination, format!("failed to read history: {e}"))
        })?;

        // Staged in the destination directory, persisted over it once complete
        let staging_dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let written = NamedTempFile::new_in(staging_dir)
            .map_err(|e| e.to_string())
            .and_then(|mut staged| {
                write_report(staged.as_file_mut(), &records)?;
                staged.persist(destination).map_err(|e| e.error.to_string())?;
                Ok(())
            });

        if let Err(message) = written {
            error!("❌ EXPORT: Failed to write {}: {}", destination.display(), message);
            return Err(DeskError::export(destination, message));
        }

        info!("✅ EXPORT: Wrote {} records to {}", records.len(), destination.display());
        Ok(ExportResponse {
            file_path: destination.to_string_lossy().to_string(),
            record_count: records.len(),
        })
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_FILE)
    }
}

fn write_report<T: serde::Serialize>(file: &mut File, records: &[T]) -> Result<(), String> {
    // Header is written by hand so an empty history still gets one
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    writer.write_record(EXPORT_HEADER).map_err(|e| e.to_string())?;
    for record in records {
        writer.serialize(record).map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

/// Basic path sanitization to handle common user input issues
fn sanitize_path(path: &str) -> String {
    let mut cleaned = path.trim().to_string();

    // Remove surrounding quotes (single or double)
    if cleaned.len() >= 2
        && ((cleaned.starts_with('"') && cleaned.ends_with('"'))
            || (cleaned.starts_with('\'') && cleaned.ends_with('\'')))
    {
        cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
    }

    cleaned = cleaned.replace("\\ ", " ");

    if cleaned.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            if cleaned == "~" {
                cleaned = home.to_string_lossy().to_string();
            } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
                cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
            }
        }
    }

    cleaned
}
