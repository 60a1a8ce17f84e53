use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One diary observation, kept as the JSON object it was read from so that
/// export writes back exactly what was loaded. Typed accessors read it
/// leniently: a field with the wrong JSON type reads as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Entry {
    fields: Map<String, Value>,
}

impl Entry {
    /// The date key, or `None` when the entry is undated (missing, empty or
    /// not a string).
    pub fn date(&self) -> Option<&str> {
        self.text("date").filter(|date| !date.is_empty())
    }

    /// Weight if it is a JSON number.
    pub fn finite_weight(&self) -> Option<f64> {
        self.number("weight")
    }

    pub fn weight_unit(&self) -> Option<&str> {
        self.text("weightUnit")
    }

    pub fn energy(&self) -> Option<&str> {
        self.text("energy")
    }

    pub fn meals(&self) -> Option<f64> {
        self.number("meals")
    }

    pub fn water_cups(&self) -> Option<f64> {
        self.number("waterCups")
    }

    pub fn walks(&self) -> Option<f64> {
        self.number("walks")
    }

    pub fn poop_quality(&self) -> Option<&str> {
        self.text("poopQuality")
    }

    pub fn meds_given(&self) -> bool {
        self.fields.get("medsGiven").and_then(Value::as_bool) == Some(true)
    }

    pub fn notes(&self) -> Option<&str> {
        self.text("notes")
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite())
    }
}

/// Non-objects become empty (undated) entries.
impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntryDocument {
    #[serde(default, deserialize_with = "entry_list")]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportView<'a> {
    pub entries: &'a [&'a Entry],
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub total: usize,
    pub html: String,
}

/// Non-object elements become empty (undated) entries instead of failing the
/// whole document.
fn entry_list<'de, D>(deserializer: D) -> Result<Vec<Entry>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(Entry::from).collect())
}
