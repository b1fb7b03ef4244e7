//! Tree node types and their persisted JSON shape.
//!
//! A folder serializes as an object of its children. A file serializes as an
//! object carrying a `"type": "file"` discriminator:
//!
//! ```json
//! { "Documents": { "INFO.txt": { "type": "file", "content": "...", "kind": "text", "icon": "..." } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Icon for recognized text files.
pub const NOTEPAD_ICON: &str = "/static/icons/notepad.webp";
/// Icon for everything else.
pub const FILE_ICON: &str = "/static/icons/file.webp";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "js", "json", "md", "html", "css"];

/// Legacy stored files were bare strings with this marker in front.
const LEGACY_CONTENT_MARKER: &str = "content:";

/// What a file holds, used by apps to pick a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Text,
    Other,
}

impl FileKind {
    /// Infer the kind from the final extension of `name`.
    pub fn infer(name: &str) -> Self {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return Self::Other;
        };
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Image
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            Self::Text
        } else {
            Self::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Other => "other",
        }
    }

    /// Default icon for this kind. Images use their content when it is a URI.
    fn icon_for(self, content: &str) -> String {
        match self {
            Self::Image if looks_like_uri(content) => content.to_string(),
            Self::Text => NOTEPAD_ICON.to_string(),
            Self::Image | Self::Other => FILE_ICON.to_string(),
        }
    }
}

fn looks_like_uri(s: &str) -> bool {
    s.starts_with('/') || s.starts_with("data:") || s.contains("://")
}

/// A file leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub content: String,
    pub kind: FileKind,
    /// Display hint URI.
    pub icon: String,
}

impl FileNode {
    /// A file whose kind and icon are inferred from `name` and `content`.
    pub fn new(name: &str, content: impl Into<String>) -> Self {
        Self::with_kind(name, content, None, None)
    }

    /// A file with an optional explicit kind and icon; missing parts are inferred.
    pub fn with_kind(
        name: &str,
        content: impl Into<String>,
        kind: Option<FileKind>,
        icon: Option<String>,
    ) -> Self {
        let content = content.into();
        let kind = kind.unwrap_or_else(|| FileKind::infer(name));
        let icon = icon.unwrap_or_else(|| kind.icon_for(&content));
        Self {
            content,
            kind,
            icon,
        }
    }

    /// Size in bytes of the content.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String("file".into()));
        map.insert("content".into(), Value::String(self.content.clone()));
        map.insert("kind".into(), Value::String(self.kind.as_str().into()));
        map.insert("icon".into(), Value::String(self.icon.clone()));
        Value::Object(map)
    }

    fn from_json(name: &str, mut map: Map<String, Value>) -> Self {
        let content = match map.remove("content") {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        let kind = map
            .remove("kind")
            .and_then(|v| serde_json::from_value::<FileKind>(v).ok());
        let icon = match map.remove("icon") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        Self::with_kind(name, content, kind, icon)
    }
}

/// A folder: uniquely named children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folder {
    children: BTreeMap<String, Node>,
}

impl Folder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Insert or replace a child.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) {
        self.children.insert(name.into(), node);
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.children.remove(name)
    }

    /// Child names in enumeration order.
    pub fn names(&self) -> Vec<String> {
        self.children.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Builder-style insert, used to lay out default trees.
    pub fn with(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(name, node.into());
        self
    }

    /// Total content bytes of every file underneath this folder.
    pub fn total_size(&self) -> u64 {
        self.children
            .values()
            .map(|node| match node {
                Node::File(file) => file.size(),
                Node::Folder(folder) => folder.total_size(),
            })
            .sum()
    }

    pub(crate) fn to_json(&self) -> Value {
        Value::Object(
            self.children
                .iter()
                .map(|(name, node)| (name.clone(), node.to_json()))
                .collect(),
        )
    }

    pub(crate) fn from_json(map: Map<String, Value>) -> Self {
        let mut folder = Self::new();
        for (name, value) in map {
            match Node::from_json(&name, value) {
                Some(node) => folder.insert(name, node),
                None => tracing::warn!(%name, "skipping unrecognized stored entry"),
            }
        }
        folder
    }
}

/// One entry in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Folder(Folder),
    File(FileNode),
}

impl Node {
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Folder(folder) => folder.to_json(),
            Self::File(file) => file.to_json(),
        }
    }

    fn from_json(name: &str, value: Value) -> Option<Self> {
        match value {
            Value::Object(map) if map.get("type").and_then(Value::as_str) == Some("file") => {
                Some(Self::File(FileNode::from_json(name, map)))
            }
            Value::Object(map) => Some(Self::Folder(Folder::from_json(map))),
            Value::String(s) => {
                let content = s.strip_prefix(LEGACY_CONTENT_MARKER).unwrap_or(&s);
                Some(Self::File(FileNode::with_kind(
                    name,
                    content,
                    Some(FileKind::Text),
                    None,
                )))
            }
            _ => None,
        }
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

impl From<FileNode> for Node {
    fn from(file: FileNode) -> Self {
        Self::File(file)
    }
}

impl Serialize for Folder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Folder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(Self::from_json(map)),
            other => Err(serde::de::Error::custom(format!(
                "expected a folder object, found {other}"
            ))),
        }
    }
}
