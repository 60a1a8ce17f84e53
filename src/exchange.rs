use crate::errors::ImportError;
use crate::models::{Entry, ExportView};
use serde_json::Value;

pub const EXPORT_FILE_NAME: &str = "dog-diary.json";

/// `{"entries": [...]}` for the given view, two-space indented.
pub fn export_view(items: &[&Entry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ExportView { entries: items })
}

/// Reads an uploaded file. Only an object with an `entries` array is accepted;
/// nothing is merged on failure.
pub fn parse_upload(text: &str) -> Result<Vec<Entry>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(mut object) => match object.remove("entries") {
            Some(Value::Array(items)) => Ok(items.into_iter().map(Entry::from).collect()),
            _ => Err(ImportError::MissingEntries),
        },
        _ => Err(ImportError::MissingEntries),
    }
}
