//! Row-per-timestep view of a decoded history.
//!
//! Every tag is sampled on its own schedule, so each row carries the last
//! value a tag reported at or before that row (forward fill). Tags that
//! have not reported yet are left blank.
//!
//! CSV layout:
//! ```txt
//! ElapsedTime,Time,<tag 0>,<tag 1>,...
//! 0,2024-03-01T08:00:00.000Z,20,,Fill
//! 10,2024-03-01T08:00:00.010Z,20,true,Heat
//! ```

use std::io;

use jiff::{Timestamp, tz::Offset};
use tracing::debug;

use super::{
    error::HistoryError,
    model::{History, TagValue},
};

pub const ELAPSED_COLUMN: &str = "ElapsedTime";
pub const TIME_COLUMN: &str = "Time";

const DELIMITER: char = ',';
const QUOTE: char = '"';
const TERMINATOR: char = '\n';

#[derive(Debug, Clone, PartialEq)]
pub struct Table<'a> {
    pub header: Vec<&'a str>,
    pub rows: Vec<Row<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    /// ms since the history start
    pub elapsed: i64,
    pub time: Timestamp,
    /// one per tag, in tag order
    pub values: Vec<Option<&'a TagValue>>,
}

pub fn tabulate(history: &History) -> Result<Table<'_>, HistoryError> {
    let mut header = vec![ELAPSED_COLUMN, TIME_COLUMN];
    header.extend(history.tags.iter().map(|tag| tag.def.name.as_str()));

    let mut cursors = vec![0usize; history.tags.len()];
    let mut last_seen: Vec<Option<&TagValue>> = vec![None; history.tags.len()];
    let mut rows = Vec::with_capacity(history.elapsed_times.len());

    for (i, &elapsed) in history.elapsed_times.iter().enumerate() {
        for ((tag, cursor), seen) in history
            .tags
            .iter()
            .zip(cursors.iter_mut())
            .zip(last_seen.iter_mut())
        {
            if tag.elapsed_indexes.get(*cursor) == Some(&i) {
                *seen = tag.values.get(*cursor);
                *cursor += 1;
            }
        }

        rows.push(Row {
            elapsed,
            time: history.time_at(elapsed)?,
            values: last_seen.clone(),
        });
    }

    debug!(rows = rows.len(), columns = header.len(), "tabulated");
    Ok(Table { header, rows })
}

pub fn history_to_csv(history: &History) -> Result<String, HistoryError> {
    Ok(tabulate(history)?.to_csv())
}

impl Row<'_> {
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.values.len() + 2);
        fields.push(self.elapsed.to_string());
        fields.push(format_time(self.time));
        fields.extend(
            self.values
                .iter()
                .map(|value| value.map(ToString::to_string).unwrap_or_default()),
        );
        fields
    }
}

impl Table<'_> {
    pub fn to_csv(&self) -> String {
        let mut res = String::new();
        push_record(&mut res, &self.header);
        for row in &self.rows {
            push_record(&mut res, &row.fields());
        }
        res
    }

    pub fn write_csv<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        let mut record = String::new();
        push_record(&mut record, &self.header);
        out.write_all(record.as_bytes())?;
        for row in &self.rows {
            record.clear();
            push_record(&mut record, &row.fields());
            out.write_all(record.as_bytes())?;
        }
        out.flush()
    }
}

/// UTC, millisecond precision, `Z` suffix
pub fn format_time(time: Timestamp) -> String {
    let dt = Offset::UTC.to_datetime(time);
    format!(
        "{}.{:03}Z",
        dt.strftime("%Y-%m-%dT%H:%M:%S"),
        dt.millisecond()
    )
}

fn push_record<S: AsRef<str>>(buf: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            buf.push(DELIMITER);
        }
        push_field(buf, field.as_ref());
    }
    buf.push(TERMINATOR);
}

/// Quotes only fields that would otherwise break the record
fn push_field(buf: &mut String, field: &str) {
    let needs_quotes = field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\r' || c == '\n');
    if !needs_quotes {
        buf.push_str(field);
        return;
    }
    buf.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            buf.push(QUOTE);
        }
        buf.push(c);
    }
    buf.push(QUOTE);
}
