use crate::db::HistoryRecord;
use crate::db::schema::HISTORY_COLUMNS;

pub const EXPORT_FILENAME: &str = "sentiment_data.csv";

/// Serialize the history log as CSV with a header row, `\n` terminated.
pub fn history_to_csv(records: &[HistoryRecord]) -> String {
    let mut out = HISTORY_COLUMNS.join(",");
    out.push('\n');
    for r in records {
        let fields = [
            r.id.to_string(),
            escape_field(&r.username),
            escape_field(&r.text),
            r.prediction.to_string(),
            r.confidence.to_string(),
            escape_field(&r.timestamp),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Quote only when needed; embedded quotes are doubled.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
