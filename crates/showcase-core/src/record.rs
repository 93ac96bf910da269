//! Project records: the canonical shape of one showcase card.
//!
//! Records arrive from the host as loosely-shaped JSON. [`RawProjectRecord`]
//! accepts whatever the host sends (missing or `null` fields included) and
//! [`RawProjectRecord::into_record`] repairs it into an immutable
//! [`ProjectRecord`]: absent service areas become the empty set, an absent
//! image becomes "no image", and an absent id is replaced by a positional one.
//!
//! Tolerance is per field: a field of the wrong type (`"image": false`, a
//! string where a list is expected) is dropped and repaired like a missing
//! one, and never fails the surrounding payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Stable, opaque record identifier. Hosts send either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

/// Featured image of a record. An empty `url` means the card has no image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectImage {
    pub url: String,
    pub alt: String,
}

impl ProjectImage {
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
        }
    }

    /// Whether there is anything to render.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// One displayable project entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: RecordId,
    pub title: String,
    pub excerpt: String,
    pub link: String,
    pub image: ProjectImage,
    /// Category slugs, deduplicated, in the order the host listed them.
    pub service_areas: Vec<String>,
}

impl ProjectRecord {
    /// Minimal record with only an id and a title. Used by hosts that build
    /// records programmatically and by tests.
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            excerpt: String::new(),
            link: String::new(),
            image: ProjectImage::default(),
            service_areas: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: ProjectImage) -> Self {
        self.image = image;
        self
    }

    #[must_use]
    pub fn with_service_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_areas = dedup_slugs(areas.into_iter().map(Into::into));
        self
    }

    /// Whether the record is tagged with `slug`.
    #[must_use]
    pub fn has_service_area(&self, slug: &str) -> bool {
        self.service_areas.iter().any(|area| area == slug)
    }

    /// Service areas joined with `,`, the form carried on rendered cards.
    #[must_use]
    pub fn joined_service_areas(&self) -> String {
        self.service_areas.join(",")
    }
}

/// Record exactly as the host sent it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawProjectRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<RecordId>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub link: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub image: Option<RawProjectImage>,
    #[serde(deserialize_with = "lenient")]
    pub service_areas: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProjectImage {
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub alt: Option<String>,
}

/// Decode a field, treating `null` and values of the wrong type as absent.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(err) => {
            warn!(%err, "ignoring field of unexpected type");
            Ok(None)
        }
    }
}

/// Ids are integers or strings; any other number keeps its textual form.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Number(n) => Some(match n.as_i64() {
            Some(int) => RecordId::Int(int),
            None => RecordId::Text(n.to_string()),
        }),
        Value::String(text) => Some(RecordId::Text(text)),
        other => {
            warn!(id = %other, "ignoring id of unexpected type");
            None
        }
    };
    Ok(id)
}

/// Decode a list of records one by one. Entries that are not JSON objects
/// are dropped with a warning; their positions still count towards
/// positional ids.
pub(crate) fn decode_records(values: Vec<Value>) -> Vec<ProjectRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<RawProjectRecord>(value) {
            Ok(raw) => Some(raw.into_record(index)),
            Err(err) => {
                warn!(index, %err, "dropping malformed project record");
                None
            }
        })
        .collect()
}

impl RawProjectRecord {
    /// Repair the raw record into a [`ProjectRecord`]. `index` is the record's
    /// position in the bootstrap list and seeds the fallback id.
    pub fn into_record(self, index: usize) -> ProjectRecord {
        let id = self.id.unwrap_or_else(|| {
            warn!(index, "project record without id; assigning positional id");
            RecordId::Text(format!("record-{index}"))
        });
        let image = self
            .image
            .map(|raw| ProjectImage {
                url: raw.url.unwrap_or_default(),
                alt: raw.alt.unwrap_or_default(),
            })
            .unwrap_or_default();
        let service_areas = match self.service_areas {
            Some(areas) => dedup_slugs(areas.into_iter()),
            None => {
                warn!(%id, "project record without serviceAreas; treating as untagged");
                Vec::new()
            }
        };

        ProjectRecord {
            id,
            title: self.title.unwrap_or_default(),
            excerpt: self.excerpt.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            image,
            service_areas,
        }
    }
}

fn dedup_slugs(areas: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for area in areas {
        let area = area.trim();
        if area.is_empty() || out.iter().any(|seen| seen == area) {
            continue;
        }
        out.push(area.to_owned());
    }
    out
}

/// A filterable category as offered by the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub label: String,
}

impl Category {
    pub fn new(slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
        }
    }
}
