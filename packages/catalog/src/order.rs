//! Deterministic catalog ordering and obsolete-message cleanup.
//!
//! Both operations are context-aware: a named context bucket is recursed
//! into, never flattened.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::message::{Catalog, CatalogMessage, Entry, Origin};

/// Sort key selection for serialized catalogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderBy {
    #[default]
    MessageId,
    Origin,
}

/// Sort a catalog by the configured key.
pub fn order(by: OrderBy, catalog: Catalog) -> Result<Catalog> {
    match by {
        OrderBy::MessageId => Ok(order_by_message_id(catalog)),
        OrderBy::Origin => order_by_origin(catalog),
    }
}

/// Lexicographic ascending key sort (byte order, locale independent),
/// applied at the top level and independently inside each context bucket.
pub fn order_by_message_id(mut catalog: Catalog) -> Catalog {
    catalog.sort_keys();
    catalog
        .into_iter()
        .map(|(key, entry)| {
            let entry = match entry {
                Entry::Context(mut bucket) => {
                    bucket.sort_keys();
                    Entry::Context(bucket)
                }
                message => message,
            };
            (key, entry)
        })
        .collect()
}

/// Sort messages by their first origin, (file, line) ascending, ties kept
/// in encounter order. Context buckets carry no origins of their own, so
/// they follow the root-bucket messages in encounter order, each bucket
/// internally origin-ordered. Fails on any message without origins.
pub fn order_by_origin(catalog: Catalog) -> Result<Catalog> {
    let mut messages = Vec::new();
    let mut buckets = Vec::new();
    for (key, entry) in catalog {
        match entry {
            Entry::Message(message) => messages.push((key, message)),
            Entry::Context(bucket) => buckets.push((key, bucket)),
        }
    }

    let mut result: Catalog = sort_by_first_origin(messages)?
        .into_iter()
        .map(|(key, message)| (key, Entry::Message(message)))
        .collect();
    for (name, bucket) in buckets {
        let sorted = sort_by_first_origin(bucket.into_iter().collect())?;
        result.insert(name, Entry::Context(sorted.into_iter().collect()));
    }
    Ok(result)
}

fn sort_by_first_origin(
    mut messages: Vec<(String, CatalogMessage)>,
) -> Result<Vec<(String, CatalogMessage)>> {
    // Normalize the origins inside each message first; the earliest one
    // becomes the message's sort key.
    for (key, message) in &mut messages {
        if message.origin.is_empty() {
            return Err(CatalogError::MissingOrigin { id: key.clone() });
        }
        message.origin.sort_by(|a, b| origin_key(a).cmp(&origin_key(b)));
    }
    messages.sort_by(|(_, a), (_, b)| origin_key(&a.origin[0]).cmp(&origin_key(&b.origin[0])));
    Ok(messages)
}

fn origin_key(origin: &Origin) -> (&str, u32) {
    // Origins without a line number sort before numbered ones in the
    // same file.
    (origin.file.as_str(), origin.line.unwrap_or(0))
}

/// Remove every obsolete message; a context bucket emptied by the filter
/// is dropped entirely.
pub fn clean_obsolete(catalog: Catalog) -> Catalog {
    let mut result = Catalog::new();
    for (key, entry) in catalog {
        match entry {
            Entry::Message(message) => {
                if !message.obsolete {
                    result.insert(key, Entry::Message(message));
                }
            }
            Entry::Context(bucket) => {
                let bucket: IndexMap<String, CatalogMessage> = bucket
                    .into_iter()
                    .filter(|(_, message)| !message.obsolete)
                    .collect();
                if !bucket.is_empty() {
                    result.insert(key, Entry::Context(bucket));
                }
            }
        }
    }
    result
}
