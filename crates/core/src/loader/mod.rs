//! CSV row loader.
//!
//! Turns a semicolon-delimited CSV export into validated `TicketRequestRow`s.
//! Individual bad rows are counted and logged, never fatal; only failing to
//! read the file at all is an error.

mod template;
mod types;

pub use template::{export_template, TEMPLATE_CSV};
pub use types::*;

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

/// Parse CSV text into accepted rows and rejections, preserving file order.
pub fn load(raw: &str) -> Result<LoadReport, LoaderError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(raw.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::new(&headers);

    let mut report = LoadReport::default();
    for (idx, record) in reader.records().enumerate() {
        let position = idx + 1;
        let parsed = match record {
            Ok(record) => columns.parse(&record),
            Err(e) => Err(RejectionReason::Malformed(e.to_string())),
        };

        match parsed {
            Ok(row) => report.rows.push(row),
            Err(reason) => {
                let rejected = RejectedRow { position, reason };
                warn!("{}", rejected);
                report.rejected.push(rejected);
            }
        }
    }

    info!(
        "{} valid tickets loaded, {} rows rejected",
        report.rows.len(),
        report.rejected_count()
    );
    Ok(report)
}

/// Read a CSV file (UTF-8) and parse it with [`load`].
pub fn load_file(path: &Path) -> Result<LoadReport, LoaderError> {
    let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| LoaderError::Encoding {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    load(&text)
}

/// Header positions of the known columns.
struct ColumnIndex {
    requester_id: Option<usize>,
    title: Option<usize>,
    description: Option<usize>,
    category_id: Option<usize>,
    urgency: Option<usize>,
    ticket_type: Option<usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Self {
        // Last occurrence wins when a header is repeated
        let find = |name: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == name)
                .map(|(i, _)| i)
                .last()
        };
        Self {
            requester_id: find(COL_REQUESTER_ID),
            title: find(COL_TITLE),
            description: find(COL_DESCRIPTION),
            category_id: find(COL_CATEGORY_ID),
            urgency: find(COL_URGENCY),
            ticket_type: find(COL_TYPE),
        }
    }

    fn parse(&self, record: &StringRecord) -> Result<TicketRequestRow, RejectionReason> {
        let get = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .filter(|value| !value.trim().is_empty())
        };

        let requester_id = get(self.requester_id);
        let title = get(self.title);
        let description = get(self.description);
        let category_id = get(self.category_id);

        let (Some(requester_id), Some(title), Some(description), Some(category_id)) =
            (requester_id, title, description, category_id)
        else {
            let missing = [
                (COL_REQUESTER_ID, requester_id),
                (COL_TITLE, title),
                (COL_DESCRIPTION, description),
                (COL_CATEGORY_ID, category_id),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect();
            return Err(RejectionReason::MissingFields(missing));
        };

        Ok(TicketRequestRow {
            requester_id: parse_id(COL_REQUESTER_ID, requester_id)?,
            title: title.to_string(),
            description: description.to_string(),
            category_id: parse_id(COL_CATEGORY_ID, category_id)?,
            raw_urgency: self.urgency.and_then(|i| record.get(i)).map(str::to_string),
            raw_type: self.ticket_type.and_then(|i| record.get(i)).map(str::to_string),
        })
    }
}

fn parse_id(field: &'static str, value: &str) -> Result<i64, RejectionReason> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| RejectionReason::NonNumericId {
            field,
            value: value.to_string(),
        })
}
