//! Context partitioning.
//!
//! A flat catalog mixes plain messages with named context buckets. The
//! merge engine and the PO adapter work on the two halves separately and
//! re-flatten afterwards.

use indexmap::IndexMap;

use crate::message::Entry;

/// A catalog split into its implicit root bucket and named contexts. The
/// two halves are disjoint by construction, so no sentinel key is needed
/// to tell them apart.
#[derive(Debug, Clone)]
pub struct ContextSplit<M> {
    pub default_messages: IndexMap<String, M>,
    pub named_contexts: IndexMap<String, IndexMap<String, M>>,
}

impl<M> Default for ContextSplit<M> {
    fn default() -> Self {
        ContextSplit {
            default_messages: IndexMap::new(),
            named_contexts: IndexMap::new(),
        }
    }
}

/// Partition a catalog into the root bucket and named context buckets,
/// preserving encounter order within each half.
pub fn split<M: Clone>(catalog: &IndexMap<String, Entry<M>>) -> ContextSplit<M> {
    let mut result = ContextSplit::default();
    for (key, entry) in catalog {
        match entry {
            Entry::Message(message) => {
                result.default_messages.insert(key.clone(), message.clone());
            }
            Entry::Context(bucket) => {
                result.named_contexts.insert(key.clone(), bucket.clone());
            }
        }
    }
    result
}

/// Re-flatten a partition: root-bucket messages first, named contexts
/// following.
pub fn compose<M>(split: ContextSplit<M>) -> IndexMap<String, Entry<M>> {
    let mut catalog = IndexMap::new();
    for (key, message) in split.default_messages {
        catalog.insert(key, Entry::Message(message));
    }
    for (name, bucket) in split.named_contexts {
        catalog.insert(name, Entry::Context(bucket));
    }
    catalog
}
