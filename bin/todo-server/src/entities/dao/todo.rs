use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

/// A row in the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl TodoRecord {
    /// A fresh record with a generated id, stamped with the current time at
    /// the precision the store keeps, so the returned record equals the row.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// Storage form of a timestamp. Fixed precision keeps `ORDER BY created_at`
/// chronological.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
