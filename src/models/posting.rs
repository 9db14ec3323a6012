use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Placeholder written for a field the extractor could not find.
pub const NOT_SPECIFIED: &str = "Not specified";

/// One job listing as returned by a job source.
///
/// Everything the pipeline does not interpret lands in `extra` and is
/// written back out untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPosting {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub site: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Accept numbers and booleans where text is expected; sources are not
/// consistent about column types.
fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl RawPosting {
    /// The description, if it carries anything at all.
    pub fn body(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("No title")
    }

    pub fn display_company(&self) -> &str {
        self.company.as_deref().unwrap_or("Unknown company")
    }
}

/// A field after merge: a real value, the sentinel, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Merged<T> {
    Value(T),
    NotSpecified,
    Omitted,
}

impl<T: Serialize> Serialize for Merged<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Merged::Value(v) => v.serialize(serializer),
            Merged::NotSpecified => serializer.serialize_str(NOT_SPECIFIED),
            Merged::Omitted => serializer.serialize_none(),
        }
    }
}

/// A posting that passed validation, with the extracted fields merged in.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedPosting {
    #[serde(flatten)]
    pub posting: RawPosting,
    pub summary: Merged<String>,
    pub essential_functions: Merged<Vec<String>>,
    pub education: Merged<String>,
    pub experience: Merged<String>,
}
