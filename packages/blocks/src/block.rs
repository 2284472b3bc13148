//! # Block Tree
//!
//! A page document is an ordered [`BlockList`] of [`Block`] nodes. Nodes are
//! reference counted and never mutated once shared: edits build new nodes
//! along the path to the change and reuse every other `Arc` as is.
//!
//! ## Stored shape
//!
//! ```json
//! {
//!   "id": "3f0c…",
//!   "type": "group",
//!   "properties": { "blocks": [ … ] },
//!   "visible": true,
//!   "original": false,
//!   "class": "mx-auto",
//!   "style": { "color": "#333" },
//!   "tag": "section",
//!   "animation": { "name": "fade-in" }
//! }
//! ```

use crate::error::BlockError;
use crate::properties::Properties;
use crate::registry::BlockType;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::ops::Deref;
use std::sync::Arc;

/// Top-level block sequence of a page
pub type Document = BlockList;

/// Single addressable node in a page document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "StoredBlock")]
pub struct Block {
    pub id: String,
    pub properties: Properties,
    pub visible: bool,
    /// Protected template content: may be hidden but not deleted
    pub original: bool,
    pub class: Option<String>,
    pub style: Option<Value>,
    pub tag: Option<String>,
    pub animation: Option<Value>,
    /// Stored keys this build does not interpret
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn new(id: impl Into<String>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            properties,
            visible: true,
            original: false,
            class: None,
            style: None,
            tag: None,
            animation: None,
            extra: Map::new(),
        }
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.properties.block_type()
    }

    /// Stored type tag (also for unknown types)
    pub fn type_tag(&self) -> &str {
        self.properties.tag()
    }

    pub fn is_container(&self) -> bool {
        self.properties.is_container()
    }

    pub fn children(&self) -> Option<&BlockList> {
        self.properties.children()
    }

    /// Copy of this container holding `children`; `None` for leaves
    pub fn with_children(&self, children: BlockList) -> Option<Block> {
        let properties = self.properties.with_children(children)?;
        Some(Block {
            properties,
            ..self.clone()
        })
    }

    /// Copy of this leaf with new properties of the same type
    pub fn with_properties(&self, properties: Properties) -> Result<Block, BlockError> {
        if self.is_container() {
            return Err(BlockError::NotALeaf(self.id.clone()));
        }
        if properties.tag() != self.type_tag() {
            return Err(BlockError::type_mismatch(
                &self.id,
                self.type_tag(),
                properties.tag(),
            ));
        }

        Ok(Block {
            properties,
            ..self.clone()
        })
    }

    /// A metadata field named `key` is set and overrides a stored `null`
    fn has_metadata(&self, key: &str) -> bool {
        match key {
            "class" => self.class.is_some(),
            "style" => self.style.is_some(),
            "tag" => self.tag.is_some(),
            "animation" => self.animation.is_some(),
            _ => false,
        }
    }

    pub fn with_visible(&self, visible: bool) -> Block {
        Block {
            visible,
            ..self.clone()
        }
    }
}

/// Ordered, shared sequence of blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockList(Arc<Vec<Arc<Block>>>);

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(blocks: Vec<Arc<Block>>) -> Self {
        Self(Arc::new(blocks))
    }

    /// Both lists are the same allocation
    pub fn ptr_eq(&self, other: &BlockList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy of the node pointers, for building the next version
    pub fn to_vec(&self) -> Vec<Arc<Block>> {
        self.0.as_ref().clone()
    }
}

impl Deref for BlockList {
    type Target = [Arc<Block>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Block>> for BlockList {
    fn from(blocks: Vec<Block>) -> Self {
        blocks.into_iter().collect()
    }
}

impl From<Vec<Arc<Block>>> for BlockList {
    fn from(blocks: Vec<Arc<Block>>) -> Self {
        Self::from_vec(blocks)
    }
}

impl FromIterator<Arc<Block>> for BlockList {
    fn from_iter<I: IntoIterator<Item = Arc<Block>>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl FromIterator<Block> for BlockList {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        iter.into_iter().map(Arc::new).collect()
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a Arc<Block>;
    type IntoIter = std::slice::Iter<'a, Arc<Block>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Stored form: `properties` is decoded only once `type` is known
#[derive(Deserialize)]
struct StoredBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    properties: Value,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default)]
    original: bool,
    #[serde(default, deserialize_with = "nullable")]
    class: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    style: Option<Option<Value>>,
    #[serde(default, rename = "tag", deserialize_with = "nullable")]
    tag_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    animation: Option<Option<Value>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn default_visible() -> bool {
    true
}

/// Tells an explicit `null` (`Some(None)`) apart from a missing key (`None`)
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Explicit nulls are kept in `extra` so they are written back as stored
fn metadata<T>(key: &str, stored: Option<Option<T>>, extra: &mut Map<String, Value>) -> Option<T> {
    match stored {
        Some(Some(value)) => Some(value),
        Some(None) => {
            extra.insert(key.to_string(), Value::Null);
            None
        }
        None => None,
    }
}

impl TryFrom<StoredBlock> for Block {
    type Error = BlockError;

    fn try_from(stored: StoredBlock) -> Result<Self, Self::Error> {
        let properties = Properties::from_tag(&stored.block_type, stored.properties)?;
        let mut extra = stored.extra;

        Ok(Block {
            id: stored.id,
            properties,
            visible: stored.visible,
            original: stored.original,
            class: metadata("class", stored.class, &mut extra),
            style: metadata("style", stored.style, &mut extra),
            tag: metadata("tag", stored.tag_name, &mut extra),
            animation: metadata("animation", stored.animation, &mut extra),
            extra,
        })
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", self.type_tag())?;
        map.serialize_entry("properties", &self.properties.payload())?;
        map.serialize_entry("visible", &self.visible)?;
        map.serialize_entry("original", &self.original)?;
        if let Some(class) = &self.class {
            map.serialize_entry("class", class)?;
        }
        if let Some(style) = &self.style {
            map.serialize_entry("style", style)?;
        }
        if let Some(tag) = &self.tag {
            map.serialize_entry("tag", tag)?;
        }
        if let Some(animation) = &self.animation {
            map.serialize_entry("animation", animation)?;
        }
        for (key, value) in &self.extra {
            if self.has_metadata(key) {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::TextProps;
    use serde_json::json;

    #[test]
    fn test_block_json_round_trip_keeps_metadata() {
        let stored = json!({
            "id": "a",
            "type": "text",
            "properties": { "content": "Welcome" },
            "visible": false,
            "original": true,
            "class": "text-center",
            "style": { "fontSize": "2rem" },
            "tag": "h2",
            "animation": { "name": "fade", "delay": 200 },
            "locked": true
        });

        let block: Block = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(block.tag.as_deref(), Some("h2"));
        assert_eq!(block.extra.get("locked"), Some(&json!(true)));

        assert_eq!(serde_json::to_value(&block).unwrap(), stored);
    }

    #[test]
    fn test_explicit_null_metadata_round_trips() {
        let stored = json!({
            "id": "a",
            "type": "text",
            "properties": { "content": "" },
            "visible": true,
            "original": false,
            "class": null,
            "style": null
        });

        let mut block: Block = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(block.class, None);
        assert_eq!(block.style, None);
        assert_eq!(serde_json::to_value(&block).unwrap(), stored);

        // Setting the field replaces the stored null
        block.class = Some("lead".to_string());
        let written = serde_json::to_string(&block).unwrap();
        assert_eq!(written.matches("\"class\"").count(), 1);
        assert!(written.contains("\"class\":\"lead\""));
    }

    #[test]
    fn test_missing_flags_default() {
        let block: Block = serde_json::from_value(json!({ "id": "a", "type": "rsvp" })).unwrap();
        assert!(block.visible);
        assert!(!block.original);
        assert_eq!(block.properties, Properties::default_for(BlockType::Rsvp));
    }

    #[test]
    fn test_nested_document_parses() {
        let doc: BlockList = serde_json::from_value(json!([
            { "id": "g", "type": "group", "properties": { "blocks": [
                { "id": "t", "type": "text", "properties": { "content": "hi" } }
            ] } }
        ]))
        .unwrap();

        let children = doc[0].children().unwrap();
        assert_eq!(children[0].id, "t");
    }

    #[test]
    fn test_with_properties_rejects_retag() {
        let block = Block::new("a", Properties::Text(TextProps::default()));
        let rsvp = Properties::default_for(BlockType::Rsvp);
        let err = block.with_properties(rsvp).unwrap_err();
        assert_eq!(err, BlockError::type_mismatch("a", "text", "rsvp"));
    }

    #[test]
    fn test_with_properties_rejects_container() {
        let group = Block::new("g", Properties::default_for(BlockType::Group));
        let err = group
            .with_properties(Properties::default_for(BlockType::Group))
            .unwrap_err();
        assert_eq!(err, BlockError::NotALeaf("g".to_string()));
    }

    #[test]
    fn test_with_children_shares_nodes() {
        let child = Arc::new(Block::new("t", Properties::Text(TextProps::default())));
        let group = Block::new("g", Properties::default_for(BlockType::Group));

        let children = BlockList::from_vec(vec![child.clone()]);
        let filled = group.with_children(children).unwrap();
        assert!(Arc::ptr_eq(&filled.children().unwrap()[0], &child));

        let leaf = Block::new("x", Properties::default_for(BlockType::Rsvp));
        assert!(leaf.with_children(BlockList::new()).is_none());
    }
}
