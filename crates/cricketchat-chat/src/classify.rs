use serde_json::Value;

use cricketchat_types::{
    AskResponse, Message, TableData, APP_FAILURE_FALLBACK, EMPTY_RESULT_MESSAGE,
};

/// Column name used when the records of a result set are bare scalars
pub const SCALAR_COLUMN: &str = "value";

/// Turn an ask response into the assistant message that answers it.
///
/// - `success: false` becomes a text turn with the server's message.
/// - an array payload becomes a table; an empty array becomes a text turn.
/// - anything else is the answer text, falling back to `message`.
pub fn classify_response(id: String, response: AskResponse) -> Message {
    let AskResponse {
        success,
        data,
        message,
        ..
    } = response;
    let message = message.filter(|m| !m.trim().is_empty());

    if !success {
        log::debug!("Server declined the question: {:?}", message);
        return Message::assistant_text(id, message.unwrap_or_else(|| APP_FAILURE_FALLBACK.to_string()));
    }

    match data {
        Some(Value::Array(records)) => {
            let table = table_from_records(&records);
            if table.columns.is_empty() || table.rows.is_empty() {
                Message::assistant_text(id, message.unwrap_or_else(|| EMPTY_RESULT_MESSAGE.to_string()))
            } else {
                Message::assistant_table(id, table)
            }
        }
        Some(Value::String(text)) if !text.is_empty() => Message::assistant_text(id, text),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            Message::assistant_text(id, message.unwrap_or_else(|| APP_FAILURE_FALLBACK.to_string()))
        }
        Some(other) => Message::assistant_text(id, other.to_string()),
    }
}

/// Build a table from a list of flat records.
///
/// Columns come from the keys of the first record in their original order.
/// Each record is projected over those columns; missing keys become null, so
/// every row has one cell per column.
pub fn table_from_records(records: &[Value]) -> TableData {
    let columns: Vec<String> = match records.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        Some(_) => vec![SCALAR_COLUMN.to_string()],
        None => Vec::new(),
    };

    let rows = records
        .iter()
        .map(|record| project(record, &columns))
        .collect();

    TableData::new(columns, rows)
}

fn project(record: &Value, columns: &[String]) -> Vec<Value> {
    match record {
        Value::Object(fields) => columns
            .iter()
            .map(|column| fields.get(column).cloned().unwrap_or(Value::Null))
            .collect(),
        // A scalar among records lands in the first column
        scalar => columns
            .iter()
            .enumerate()
            .map(|(i, _)| if i == 0 { scalar.clone() } else { Value::Null })
            .collect(),
    }
}
