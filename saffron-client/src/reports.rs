//! Report service
//!
//! Wraps the pure report engine with the dashboard's side effect: every
//! successful generation and every export appends an entry to a
//! persisted history log, capped at [`MAX_REPORT_HISTORY`] entries
//! (oldest first out).

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{ClientError, ClientResult};
use shared::models::{Booking, Session};
use shared::report::{
    self, ExportFormat, GeneratedReport, MAX_REPORT_HISTORY, ReportAction, ReportFilters,
    ReportHistoryEntry,
};

/// Report generation service with persisted history
pub struct ReportService {
    history_path: PathBuf,
    history: Mutex<Vec<ReportHistoryEntry>>,
}

impl ReportService {
    /// Open the service backed by the given history log path.
    ///
    /// Missing file starts an empty log; a corrupt log is logged and
    /// reset rather than failing the dashboard.
    pub fn open(history_path: impl AsRef<Path>) -> ClientResult<Self> {
        let history_path = history_path.as_ref().to_path_buf();
        let history = match std::fs::read_to_string(&history_path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %history_path.display(), error = %e, "Corrupt report history, starting empty");
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(ClientError::Storage(e)),
        };

        Ok(Self {
            history_path,
            history: Mutex::new(history),
        })
    }

    /// Generate a report and record it in the history log
    pub fn generate(
        &self,
        filters: &ReportFilters,
        bookings: &[Booking],
        sessions: &[Session],
        today: chrono::NaiveDate,
    ) -> GeneratedReport {
        let generated = report::generate(filters, bookings, sessions, today);
        self.append(ReportHistoryEntry {
            report_type: filters.report_type,
            range_label: filters.range.label(),
            action: ReportAction::Generated,
            row_count: generated.rows.len() as i64,
            created_at: shared::util::now_millis(),
        });
        generated
    }

    /// Export already-generated rows and record the export
    pub fn export(&self, generated: &GeneratedReport, format: ExportFormat) -> String {
        let output = report::export(generated, format);
        self.append(ReportHistoryEntry {
            report_type: generated.report_type,
            range_label: format!("{}..{}", generated.start_date, generated.end_date),
            action: ReportAction::Exported,
            row_count: generated.rows.len() as i64,
            created_at: shared::util::now_millis(),
        });
        output
    }

    /// History snapshot, oldest first
    pub fn history(&self) -> Vec<ReportHistoryEntry> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportHistoryEntry>> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn append(&self, entry: ReportHistoryEntry) {
        let mut history = self.lock();
        history.push(entry);
        if history.len() > MAX_REPORT_HISTORY {
            let overflow = history.len() - MAX_REPORT_HISTORY;
            history.drain(..overflow);
        }
        match serde_json::to_string_pretty(&*history) {
            Ok(serialized) => {
                if let Err(e) = std::fs::write(&self.history_path, serialized) {
                    tracing::error!(path = %self.history_path.display(), error = %e, "Failed to persist report history");
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to serialize report history"),
        }
    }
}
