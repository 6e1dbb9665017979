//! Catalog data model
//!
//! Messages, source origins, and the tagged entry type distinguishing a
//! plain message from a named context bucket. The message/context shape is
//! decided once, when an entry is deserialized, and carried as a variant
//! from then on.

use indexmap::IndexMap;
use serde::de::{self, Deserializer, SeqAccess};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A source location where a message was found.
///
/// On the wire this is a one- or two-element array: `["src/app.js", 12]`,
/// or `["src/app.js"]` when no line number is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub file: String,
    pub line: Option<u32>,
}

impl Origin {
    pub fn new(file: impl Into<String>, line: Option<u32>) -> Self {
        Origin {
            file: file.into(),
            line,
        }
    }
}

impl Serialize for Origin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.line.is_some() { 2 } else { 1 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.file)?;
        if let Some(line) = self.line {
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Origin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OriginVisitor;

        impl<'de> de::Visitor<'de> for OriginVisitor {
            type Value = Origin;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an origin array [file, line?]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Origin, A::Error> {
                let file: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                // The line slot may be absent or an explicit null.
                let line = seq.next_element::<Option<u32>>()?.flatten();
                Ok(Origin { file, line })
            }
        }

        deserializer.deserialize_seq(OriginVisitor)
    }
}

/// A raw message record produced by one extraction pass. Ephemeral: built
/// fresh on every run and consumed by the merge engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedMessage {
    /// Default text authored in the source locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<String>,
    /// Every source location the message was extracted from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub origin: Vec<Origin>,
    /// Comments addressed to translators by the extraction tooling.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extracted_comments: Vec<String>,
    /// Free-form translator comments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// No longer referenced by current sources.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub obsolete: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Named context the message belongs to, when it carries one inline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A durable catalog record: an extracted message plus the stored
/// translation, the only field expected to accumulate human edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogMessage {
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub origin: Vec<Origin>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extracted_comments: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub obsolete: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl From<ExtractedMessage> for CatalogMessage {
    fn from(message: ExtractedMessage) -> Self {
        CatalogMessage {
            translation: String::new(),
            defaults: message.defaults,
            origin: message.origin,
            extracted_comments: message.extracted_comments,
            comments: message.comments,
            obsolete: message.obsolete,
            flags: message.flags,
            context: message.context,
        }
    }
}

/// One top-level catalog entry: either a plain message, or a bucket of
/// messages sharing a named context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry<M> {
    Message(M),
    Context(IndexMap<String, M>),
}

impl<M> Entry<M> {
    pub fn as_message(&self) -> Option<&M> {
        match self {
            Entry::Message(message) => Some(message),
            Entry::Context(_) => None,
        }
    }

    pub fn as_context(&self) -> Option<&IndexMap<String, M>> {
        match self {
            Entry::Message(_) => None,
            Entry::Context(bucket) => Some(bucket),
        }
    }
}

// An entry is a message iff it carries `origin`, `translation`, or
// `context`; anything else is read as a nested per-context map. The check
// runs here, exactly once per entry.
impl<'de, M> Deserialize<'de> for Entry<M>
where
    M: de::DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let is_message = match value.as_object() {
            Some(map) => {
                map.contains_key("origin")
                    || map.contains_key("translation")
                    || map.contains_key("context")
            }
            None => return Err(de::Error::custom("catalog entry must be an object")),
        };
        if is_message {
            serde_json::from_value(value)
                .map(Entry::Message)
                .map_err(de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(Entry::Context)
                .map_err(de::Error::custom)
        }
    }
}

pub type ExtractedEntry = Entry<ExtractedMessage>;
pub type CatalogEntry = Entry<CatalogMessage>;

/// Raw extraction output for one catalog, keyed by message id.
pub type ExtractedCatalog = IndexMap<String, ExtractedEntry>;
/// A persisted catalog for one locale, keyed by message id.
pub type Catalog = IndexMap<String, CatalogEntry>;
/// Catalogs for every configured locale.
pub type AllCatalogs = IndexMap<String, Catalog>;

/// Promote extraction output to catalog shape with empty translations,
/// e.g. for writing a template file.
pub fn promote_extracted(extracted: ExtractedCatalog) -> Catalog {
    extracted
        .into_iter()
        .map(|(key, entry)| {
            let entry = match entry {
                Entry::Message(message) => Entry::Message(CatalogMessage::from(message)),
                Entry::Context(bucket) => Entry::Context(
                    bucket
                        .into_iter()
                        .map(|(key, message)| (key, CatalogMessage::from(message)))
                        .collect(),
                ),
            };
            (key, entry)
        })
        .collect()
}
