//! Type-specific block payloads.
//!
//! `Properties` is the tagged union over the closed set of block types.
//! Only `Group` and `Row` carry a child sequence; every traversal matches
//! on the variant instead of probing payload fields.
//!
//! Every payload struct keeps the stored keys it does not model in `extra`,
//! so documents written by newer builds survive a load and save here.

use crate::block::BlockList;
use crate::error::{BlockError, BlockResult};
use crate::registry::BlockType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProps {
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextProps {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            extra: Map::new(),
        }
    }
}

/// Text with a `{value}` placeholder filled from a page URL query parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextQueryProps {
    pub content: String,
    /// Name of the query parameter
    pub query: String,
    /// Used when the parameter is missing
    pub fallback: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextQueryProps {
    pub const PLACEHOLDER: &'static str = "{value}";

    /// Fill the placeholder with `value`, or the fallback when absent
    pub fn resolve(&self, value: Option<&str>) -> String {
        let value = value.filter(|v| !v.is_empty()).unwrap_or(&self.fallback);
        self.content.replace(Self::PLACEHOLDER, value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerProps {
    pub blocks: BlockList,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContainerProps {
    /// Same container payload around other children
    pub fn holding(&self, blocks: BlockList) -> Self {
        Self {
            blocks,
            extra: self.extra.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProps {
    /// Stored file reference, empty until an upload completes
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_self")]
    SameTab,
    #[serde(rename = "_blank")]
    NewTab,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkProps {
    pub label: String,
    pub url: String,
    pub target: LinkTarget,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineItem {
    pub time: String,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineProps {
    pub items: Vec<TimelineItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `date` is kept exactly as stored; [`CountdownProps::target`] reads it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownProps {
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CountdownProps {
    const LOCAL_FORMATS: [&'static str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    pub fn at(date: DateTime<Utc>) -> Self {
        Self {
            date: Some(date.to_rfc3339()),
            extra: Map::new(),
        }
    }

    /// Moment the countdown ends
    ///
    /// Dates without an offset (`datetime-local` form values, plain dates)
    /// are read as UTC. `None` when unset or unreadable.
    pub fn target(&self) -> Option<DateTime<Utc>> {
        let date = self.date.as_deref()?.trim();
        if let Ok(date) = DateTime::parse_from_rfc3339(date) {
            return Some(date.with_timezone(&Utc));
        }

        let naive = Self::LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .ok()
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
            })?;
        Some(Utc.from_utc_datetime(&naive))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryProps {
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientTitleProps {
    pub content: String,
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for GradientTitleProps {
    fn default() -> Self {
        Self {
            content: String::new(),
            from: "#f472b6".to_string(),
            to: "#8b5cf6".to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElegantTitleProps {
    pub content: String,
    pub subtitle: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


/// The RSVP form is configured per site, not per block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsvpProps {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Block payload, one variant per block type
#[derive(Debug, Clone, PartialEq)]
pub enum Properties {
    Text(TextProps),
    TextQuery(TextQueryProps),
    Group(ContainerProps),
    Row(ContainerProps),
    Image(ImageProps),
    Link(LinkProps),
    Timeline(TimelineProps),
    Countdown(CountdownProps),
    Gallery(GalleryProps),
    Rsvp(RsvpProps),
    GradientTitle(GradientTitleProps),
    ElegantTitle(ElegantTitleProps),
    /// A type this build does not know; kept verbatim and treated as a leaf
    Unknown { tag: String, properties: Value },
}

impl Properties {
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Text => Properties::Text(TextProps::default()),
            BlockType::TextQuery => Properties::TextQuery(TextQueryProps::default()),
            BlockType::Group => Properties::Group(ContainerProps::default()),
            BlockType::Row => Properties::Row(ContainerProps::default()),
            BlockType::Image => Properties::Image(ImageProps::default()),
            BlockType::Link => Properties::Link(LinkProps::default()),
            BlockType::Timeline => Properties::Timeline(TimelineProps::default()),
            BlockType::Countdown => Properties::Countdown(CountdownProps::default()),
            BlockType::Gallery => Properties::Gallery(GalleryProps::default()),
            BlockType::Rsvp => Properties::Rsvp(RsvpProps::default()),
            BlockType::GradientTitle => Properties::GradientTitle(GradientTitleProps::default()),
            BlockType::ElegantTitle => Properties::ElegantTitle(ElegantTitleProps::default()),
        }
    }

    /// Decode a stored payload for `tag`
    ///
    /// Unrecognized tags become `Unknown`; a recognized tag with a payload
    /// of the wrong shape is an error.
    pub fn from_tag(tag: &str, payload: Value) -> BlockResult<Self> {
        let Ok(block_type) = tag.parse::<BlockType>() else {
            return Ok(Properties::Unknown {
                tag: tag.to_string(),
                properties: payload,
            });
        };

        // Older documents store `null` or omit the payload entirely
        let payload = if payload.is_null() {
            Value::Object(Default::default())
        } else {
            payload
        };

        let decoded = match block_type {
            BlockType::Text => serde_json::from_value(payload).map(Properties::Text),
            BlockType::TextQuery => serde_json::from_value(payload).map(Properties::TextQuery),
            BlockType::Group => serde_json::from_value(payload).map(Properties::Group),
            BlockType::Row => serde_json::from_value(payload).map(Properties::Row),
            BlockType::Image => serde_json::from_value(payload).map(Properties::Image),
            BlockType::Link => serde_json::from_value(payload).map(Properties::Link),
            BlockType::Timeline => serde_json::from_value(payload).map(Properties::Timeline),
            BlockType::Countdown => serde_json::from_value(payload).map(Properties::Countdown),
            BlockType::Gallery => serde_json::from_value(payload).map(Properties::Gallery),
            BlockType::Rsvp => serde_json::from_value(payload).map(Properties::Rsvp),
            BlockType::GradientTitle => {
                serde_json::from_value(payload).map(Properties::GradientTitle)
            }
            BlockType::ElegantTitle => {
                serde_json::from_value(payload).map(Properties::ElegantTitle)
            }
        };

        decoded.map_err(|e| BlockError::invalid_properties(tag, e.to_string()))
    }

    /// `None` for unknown types
    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            Properties::Text(_) => Some(BlockType::Text),
            Properties::TextQuery(_) => Some(BlockType::TextQuery),
            Properties::Group(_) => Some(BlockType::Group),
            Properties::Row(_) => Some(BlockType::Row),
            Properties::Image(_) => Some(BlockType::Image),
            Properties::Link(_) => Some(BlockType::Link),
            Properties::Timeline(_) => Some(BlockType::Timeline),
            Properties::Countdown(_) => Some(BlockType::Countdown),
            Properties::Gallery(_) => Some(BlockType::Gallery),
            Properties::Rsvp(_) => Some(BlockType::Rsvp),
            Properties::GradientTitle(_) => Some(BlockType::GradientTitle),
            Properties::ElegantTitle(_) => Some(BlockType::ElegantTitle),
            Properties::Unknown { .. } => None,
        }
    }

    /// Stored `type` tag, including tags of unknown types
    pub fn tag(&self) -> &str {
        match self {
            Properties::Unknown { tag, .. } => tag,
            known => known.block_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    pub fn children(&self) -> Option<&BlockList> {
        match self {
            Properties::Group(props) | Properties::Row(props) => Some(&props.blocks),
            _ => None,
        }
    }

    /// Same container variant holding `children`; `None` for leaves
    pub fn with_children(&self, children: BlockList) -> Option<Self> {
        match self {
            Properties::Group(props) => Some(Properties::Group(props.holding(children))),
            Properties::Row(props) => Some(Properties::Row(props.holding(children))),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    /// Serializes the payload without its tag
    pub fn payload(&self) -> Payload<'_> {
        Payload(self)
    }
}

/// Untagged view of a payload, as stored under a block's `properties` key
pub struct Payload<'a>(&'a Properties);

impl Serialize for Payload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Properties::Text(props) => props.serialize(serializer),
            Properties::TextQuery(props) => props.serialize(serializer),
            Properties::Group(props) | Properties::Row(props) => props.serialize(serializer),
            Properties::Image(props) => props.serialize(serializer),
            Properties::Link(props) => props.serialize(serializer),
            Properties::Timeline(props) => props.serialize(serializer),
            Properties::Countdown(props) => props.serialize(serializer),
            Properties::Gallery(props) => props.serialize(serializer),
            Properties::Rsvp(props) => props.serialize(serializer),
            Properties::GradientTitle(props) => props.serialize(serializer),
            Properties::ElegantTitle(props) => props.serialize(serializer),
            Properties::Unknown { properties, .. } => properties.serialize(serializer),
        }
    }
}

/// Payload tagged with its type, used where properties travel without a block
/// (for example in update commands): `{"type": "text", "properties": {...}}`
impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", self.tag())?;
        map.serialize_entry("properties", &self.payload())?;
        map.end()
    }
}

#[derive(Deserialize)]
struct TaggedPayload {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    properties: Value,
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = TaggedPayload::deserialize(deserializer)?;
        Properties::from_tag(&tagged.tag, tagged.properties).map_err(serde::de::Error::custom)
    }
}
