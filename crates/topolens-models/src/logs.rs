//! Upstream log records and local pagination.
//!
//! The portal and server admin APIs return up to 1000 log messages per
//! query; the backend filters by exact level and paginates locally before
//! returning a [`LogPage`] to the UI.

use serde::{Deserialize, Serialize};

/// One upstream log message.
///
/// Only `level` is interpreted; everything else the subsystem reported is
/// passed through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity level as reported upstream (`SEVERE`, `WARNING`, ...).
    #[serde(default)]
    pub level: String,
    /// Remaining upstream fields (time, message, source, machine, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of filtered log records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    /// Total records after level filtering, across all pages.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Page size used for the slice.
    pub page_size: usize,
    /// The records of this page.
    pub data: Vec<LogRecord>,
}

/// Filter by exact level (when given) and slice out one page.
pub fn paginate(records: Vec<LogRecord>, level: Option<&str>, page: usize, page_size: usize) -> LogPage {
    let filtered: Vec<LogRecord> = match level {
        Some(level) if !level.is_empty() => {
            records.into_iter().filter(|r| r.level == level).collect()
        }
        _ => records,
    };

    let total = filtered.len();
    let page = page.max(1);
    let page_size = page_size.max(1);
    // Page numbers come straight from the query string; a huge value must
    // yield an empty page, not an overflow.
    let start = page.saturating_sub(1).saturating_mul(page_size);
    let data = filtered
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    LogPage {
        total,
        page,
        page_size,
        data,
    }
}
