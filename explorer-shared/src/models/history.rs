//! Search results, generated images and the history lists built from them.
//!
//! The API returns loosely shaped JSON here: search results are whatever the
//! upstream tool produced, and image records name their link either
//! `image_url` or `url`. Everything is normalized once, at deserialization,
//! so views only ever ask for [`ResultEntry::display_text`] or
//! [`HistoryItem::summary`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};
use std::{fmt, str::FromStr};

/// One search result, classified by the field that carries its text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEntry {
    /// `{ "text": ... }` or a bare string.
    Text(String),
    /// `{ "title": ... }`
    Titled(String),
    /// `{ "snippet": ... }`
    Snippet(String),
    /// `{ "query": ... }`, as found when history rows are shown as results.
    Query(String),
    /// Any other shape, kept verbatim.
    Other(Value),
}

impl ResultEntry {
    /// Classify a raw JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if let Value::String(text) = value {
            return Self::Text(text);
        }

        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_owned)
        };

        if let Some(text) = field("text") {
            Self::Text(text)
        } else if let Some(title) = field("title") {
            Self::Titled(title)
        } else if let Some(snippet) = field("snippet") {
            Self::Snippet(snippet)
        } else if let Some(query) = field("query") {
            Self::Query(query)
        } else {
            Self::Other(value)
        }
    }

    /// The single string a view shows for this result.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) | Self::Titled(text) | Self::Snippet(text) | Self::Query(text) => {
                text.clone()
            }
            Self::Other(value) => value.to_string(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => json!({ "text": text }),
            Self::Titled(title) => json!({ "title": title }),
            Self::Snippet(snippet) => json!({ "snippet": snippet }),
            Self::Query(query) => json!({ "query": query }),
            Self::Other(value) => value.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for ResultEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Serialize for ResultEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

/// Accept any JSON for a list field: arrays yield their well-formed items,
/// everything else yields an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed list item");
                None
            }
        })
        .collect())
}

/// Response of `GET /search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Query echoed back by the server.
    #[serde(default)]
    pub query: Option<String>,
    /// Results in server order.
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<ResultEntry>,
    /// When the search was recorded.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One row of `GET /search/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    /// Server-side identifier, used for deletion.
    pub id: i64,
    /// The query that was run.
    #[serde(default)]
    pub query: String,
    /// Stored results of that query.
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<ResultEntry>,
    /// When the search was recorded.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SearchHistoryItem {
    /// Display text of the first stored result, if there is one.
    #[must_use]
    pub fn first_snippet(&self) -> Option<String> {
        self.results.first().map(ResultEntry::display_text)
    }
}

/// Response of `GET /search/history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryResponse {
    /// Past searches, newest first.
    #[serde(default, deserialize_with = "lenient_list")]
    pub search_history: Vec<SearchHistoryItem>,
}

/// One row of `GET /image/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHistoryItem {
    /// Server-side identifier, used for deletion.
    pub id: i64,
    /// Prompt the image was generated from.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Link to the generated image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Alternate link field used by some responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the image was generated.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ImageHistoryItem {
    /// Link to the image, preferring `image_url` over `url`.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        non_empty(self.image_url.as_deref()).or_else(|| non_empty(self.url.as_deref()))
    }

    /// Prompt, if a non-empty one was recorded.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        non_empty(self.prompt.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Response of `GET /image/history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageHistoryResponse {
    /// Past generations, newest first.
    #[serde(default, deserialize_with = "lenient_list")]
    pub image_history: Vec<ImageHistoryItem>,
}

/// Response of `POST /image`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Identifier, when the server returns one.
    #[serde(default)]
    pub id: Option<i64>,
    /// Prompt echoed back by the server.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Link to the generated image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Alternate link field.
    #[serde(default)]
    pub url: Option<String>,
    /// When the image was generated.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl GeneratedImage {
    /// Link to the image, preferring `image_url` over `url`.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        non_empty(self.image_url.as_deref()).or_else(|| non_empty(self.url.as_deref()))
    }

    /// Convert into a history row, using `fallback_id` when the server sent
    /// no identifier.
    #[must_use]
    pub fn into_history_item(self, fallback_id: i64) -> ImageHistoryItem {
        ImageHistoryItem {
            id: self.id.unwrap_or(fallback_id),
            prompt: self.prompt,
            image_url: self.image_url,
            url: self.url,
            timestamp: self.timestamp,
        }
    }
}

/// Which history list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    /// Search history.
    Search,
    /// Image-generation history.
    Image,
}

impl HistoryKind {
    /// Canonical lowercase name, also the API path prefix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Image => "image",
        }
    }

    /// File name used when the list is exported.
    #[must_use]
    pub fn export_file_name(self) -> &'static str {
        match self {
            Self::Search => "search_history.csv",
            Self::Image => "image_history.csv",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "search" => Ok(Self::Search),
            "image" => Ok(Self::Image),
            _ => Err("unknown history kind"),
        }
    }
}

/// A history row of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryItem {
    /// A past search.
    Search(SearchHistoryItem),
    /// A past image generation.
    Image(ImageHistoryItem),
}

impl HistoryItem {
    /// Server-side identifier.
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Search(item) => item.id,
            Self::Image(item) => item.id,
        }
    }

    /// Which list the item belongs to.
    #[must_use]
    pub fn kind(&self) -> HistoryKind {
        match self {
            Self::Search(_) => HistoryKind::Search,
            Self::Image(_) => HistoryKind::Image,
        }
    }

    /// Canonical one-line description of the item.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Search(item) => item.first_snippet().unwrap_or_else(|| item.query.clone()),
            Self::Image(item) => item.prompt().unwrap_or("No prompt").to_string(),
        }
    }
}

impl From<SearchHistoryItem> for HistoryItem {
    fn from(item: SearchHistoryItem) -> Self {
        Self::Search(item)
    }
}

impl From<ImageHistoryItem> for HistoryItem {
    fn from(item: ImageHistoryItem) -> Self {
        Self::Image(item)
    }
}
