use crate::models::Entry;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `asc` sorts ascending; anything else descending.
    pub fn parse(value: &str) -> Self {
        if value == "asc" { Self::Asc } else { Self::Desc }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Month prefix plus sort direction, as sent by the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewQuery {
    pub month: String,
    pub sort: SortDirection,
}

impl ViewQuery {
    pub fn new(month: impl Into<String>, sort: SortDirection) -> Self {
        Self {
            month: month.into(),
            sort,
        }
    }
}

/// Dated entries whose date starts with `query.month` (a literal prefix, no
/// calendar parsing), sorted by date string.
pub fn current_entries<'a>(entries: &'a [Entry], query: &ViewQuery) -> Vec<&'a Entry> {
    let mut items: Vec<(&str, &Entry)> = entries
        .iter()
        .filter_map(|entry| entry.date().map(|date| (date, entry)))
        .filter(|(date, _)| query.month.is_empty() || date.starts_with(query.month.as_str()))
        .collect();

    match query.sort {
        SortDirection::Asc => items.sort_by(|a, b| a.0.cmp(b.0)),
        SortDirection::Desc => items.sort_by(|a, b| b.0.cmp(a.0)),
    }

    items.into_iter().map(|(_, entry)| entry).collect()
}
