use crate::domain::repository::ChatRepository;
use crate::domain::user::User;
use crate::error::Result;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

const EXPECTED_COLUMNS: usize = 4;

/// Result of importing one line of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Imported,
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based line number in the source file, header included.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub failed: Vec<RowFailure>,
}

impl ImportReport {
    fn record(&mut self, line: usize, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Imported => self.imported += 1,
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Failed { reason } => {
                tracing::warn!(line, reason = %reason, "User row rejected");
                self.failed.push(RowFailure { line, reason });
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSummary {
    /// The users table already had rows, so nothing was read.
    TableNotEmpty { existing: i64 },
    Completed(ImportReport),
}

/// One-shot seeding of the users table from a comma-delimited export with
/// header `id,displayName,createdAt,lastLoginAt`.
#[derive(Clone, Debug)]
pub struct UserImportService {
    repo: Arc<dyn ChatRepository>,
}

impl UserImportService {
    #[must_use]
    pub fn new(repo: Arc<dyn ChatRepository>) -> Self {
        Self { repo }
    }

    /// Imports every row of `contents` unless the users table is populated.
    /// A bad row is recorded and skipped; it never aborts the import.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the users table cannot be counted.
    #[tracing::instrument(err, skip(self, contents))]
    pub async fn import(&self, contents: &str) -> Result<ImportSummary> {
        let existing = self.repo.count_users().await?;
        if existing > 0 {
            tracing::info!(existing, "Skipping user import, users table is not empty");
            return Ok(ImportSummary::TableNotEmpty { existing });
        }

        let mut report = ImportReport::default();
        // Line 1 is the header.
        for (index, raw) in contents.lines().enumerate().skip(1) {
            let outcome = self.import_row(raw).await;
            report.record(index + 1, outcome);
        }

        tracing::info!(
            imported = report.imported,
            skipped = report.skipped,
            failed = report.failed.len(),
            "User import finished"
        );
        Ok(ImportSummary::Completed(report))
    }

    async fn import_row(&self, raw: &str) -> RowOutcome {
        let user = match parse_row(raw) {
            Ok(Some(user)) => user,
            Ok(None) => return RowOutcome::Skipped,
            Err(reason) => return RowOutcome::Failed { reason },
        };

        match self.repo.insert_user(&user).await {
            Ok(true) => RowOutcome::Imported,
            Ok(false) => {
                tracing::debug!(user_id = %user.id, "User already present");
                RowOutcome::Skipped
            }
            Err(e) => RowOutcome::Failed { reason: e.to_string() },
        }
    }
}

/// Parses one data line. Blank lines yield `Ok(None)`.
fn parse_row(raw: &str) -> std::result::Result<Option<User>, String> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let columns: Vec<&str> = line.split(',').map(str::trim).collect();
    let [id, display_name, created_at, last_login_at] = columns.as_slice() else {
        return Err(format!("expected {EXPECTED_COLUMNS} columns, found {}", columns.len()));
    };

    if id.is_empty() {
        return Err("empty user id".to_string());
    }

    Ok(Some(User {
        id: (*id).to_string(),
        display_name: (*display_name).to_string(),
        created_at: parse_timestamp(created_at).map_err(|e| format!("invalid createdAt: {e}"))?,
        last_login_at: parse_timestamp(last_login_at).map_err(|e| format!("invalid lastLoginAt: {e}"))?,
    }))
}

/// Accepts RFC 3339 or `YYYY-MM-DD HH:MM:SS`, the latter taken as UTC.
fn parse_timestamp(value: &str) -> std::result::Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339).or_else(|_| {
        PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .map(PrimitiveDateTime::assume_utc)
    })
}
