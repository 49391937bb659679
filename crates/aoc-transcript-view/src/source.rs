use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed record on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Display lines produced from one transcript load.
///
/// `timestamps` is either empty or holds exactly one entry per line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub lines: Vec<String>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub skipped: usize,
}

pub fn load_file(path: &Path) -> Result<Transcript, TranscriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| TranscriptError::Io {
        origin: path.display().to_string(),
        source,
    })?;
    Ok(parse_transcript(&content))
}

pub fn load_reader(mut reader: impl Read) -> Result<Transcript, TranscriptError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| TranscriptError::Io {
            origin: "<stdin>".to_string(),
            source,
        })?;
    Ok(parse_transcript(&content))
}

/// Turns JSONL agent records into display lines. Non-JSON lines pass through
/// verbatim; lines that look like JSON objects but fail to parse are skipped.
pub fn parse_transcript(content: &str) -> Transcript {
    let mut lines = Vec::new();
    let mut stamps: Vec<Option<DateTime<Utc>>> = Vec::new();
    let mut skipped = 0;

    for (idx, raw) in content.lines().enumerate() {
        match parse_record(idx + 1, raw) {
            Ok(Some(record)) => {
                for line in record.lines {
                    lines.push(line);
                    stamps.push(record.timestamp);
                }
            }
            Ok(None) => {
                lines.push(raw.to_string());
                stamps.push(None);
            }
            Err(err) => {
                warn!(error = %err, "skipping transcript record");
                skipped += 1;
            }
        }
    }

    let timestamps = if !stamps.is_empty() && stamps.iter().all(Option::is_some) {
        stamps.into_iter().flatten().collect()
    } else {
        Vec::new()
    };

    Transcript {
        lines,
        timestamps,
        skipped,
    }
}

#[derive(Debug)]
struct Record {
    timestamp: Option<DateTime<Utc>>,
    lines: Vec<String>,
}

/// `Ok(None)` means the line is not a JSON object and should be shown as is.
fn parse_record(line_no: usize, raw: &str) -> Result<Option<Record>, TranscriptError> {
    if !raw.trim_start().starts_with('{') {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(raw).map_err(|source| TranscriptError::Json {
        line: line_no,
        source,
    })?;
    let Some(obj) = value.as_object() else {
        return Ok(None);
    };

    let message = obj.get("message").filter(|value| value.is_object());
    let timestamp = obj
        .get("timestamp")
        .or_else(|| obj.get("ts"))
        .and_then(parse_timestamp);
    let role = obj
        .get("role")
        .or_else(|| message.and_then(|msg| msg.get("role")))
        .or_else(|| obj.get("type"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|role| !role.is_empty());
    let body = obj
        .get("content")
        .or_else(|| obj.get("text"))
        .or_else(|| obj.get("message").filter(|value| value.is_string()))
        .or_else(|| message.and_then(|msg| msg.get("content")))
        .map(content_text)
        .unwrap_or_default();

    let mut lines: Vec<String> = body.lines().map(str::to_string).collect();
    if let Some(role) = role {
        let tag = format!("[{role}]");
        match lines.first_mut() {
            Some(first) => *first = format!("{tag} {first}"),
            None => lines.push(tag),
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    Ok(Some(Record { timestamp, lines }))
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn content_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(text) => Some(text.clone()),
                Value::Object(obj) => obj
                    .get("text")
                    .or_else(|| obj.get("content"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(obj) => obj
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
