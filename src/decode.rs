//! Decoding of upstream responses into tables.

use serde_json::Value;

use crate::errors::{Error, Warning};
use crate::query::Direction;
use crate::types::{Cell, Table};

/// Decodes one upstream response into a table.
///
/// Empty bodies, 204s, and header-only payloads are legitimate zero-row
/// results. A body that cannot be decoded is a terminal [`Error::Decode`],
/// never silently turned into an empty table.
pub(crate) fn decode_response(
    status: u16,
    body: &str,
    direction: Direction,
    warnings: &mut Vec<Warning>,
) -> Result<Table, Error> {
    match status {
        200 => {}
        204 => return Ok(Table::default()),
        _ => {
            let snippet = truncate_body(body);
            tracing::error!("Error fetching {} data: status {}: {}", direction, status, snippet);
            return Err(Error::HttpStatus {
                status,
                body: snippet,
            });
        }
    }

    if body.is_empty() {
        tracing::warn!("Received status 200 but no content for {}", direction);
        warnings.push(Warning::EmptyBody);
        return Ok(Table::default());
    }

    let payload: Value = serde_json::from_str(body).map_err(|e| {
        decode_error(direction, format!("invalid JSON: {}", e), body)
    })?;

    let outer = match payload {
        Value::Array(outer) => outer,
        other => {
            return Err(decode_error(
                direction,
                format!("expected an array of arrays, got {}", json_type(&other)),
                body,
            ))
        }
    };

    let mut arrays = Vec::with_capacity(outer.len());
    for item in &outer {
        match item {
            Value::Array(cells) => arrays.push(cells),
            other => {
                return Err(decode_error(
                    direction,
                    format!("expected an inner array, got {}", json_type(other)),
                    body,
                ))
            }
        }
    }

    let Some((header, data)) = arrays.split_first() else {
        return Ok(Table::default());
    };
    let header: Vec<String> = header.iter().map(field_name).collect();

    // First occurrence wins when the API repeats a field name.
    let keep: Vec<bool> = header
        .iter()
        .enumerate()
        .map(|(i, name)| !header[..i].contains(name))
        .collect();
    let columns = header
        .iter()
        .zip(&keep)
        .filter(|(_, &kept)| kept)
        .map(|(name, _)| name.clone())
        .collect();

    let mut table = Table::new(columns);
    for cells in data {
        let row = (0..header.len())
            .filter(|&i| keep[i])
            .map(|i| cells.get(i).map(Cell::from).unwrap_or(Cell::Empty))
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

fn field_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn decode_error(direction: Direction, detail: String, body: &str) -> Error {
    let snippet = truncate_body(body);
    tracing::error!("Failed to decode {} response: {} | body: {}", direction, detail, snippet);
    Error::Decode {
        detail,
        body: snippet,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
