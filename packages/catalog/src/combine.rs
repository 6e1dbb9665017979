//! Merging of duplicate extraction records.
//!
//! One extraction pass can discover the same message id in many source
//! files, each fragment carrying its own origins and extracted comments.
//! Combining concatenates those lists and keeps the latest record's
//! remaining fields; records that disagree on default text are a hard
//! error.

use indexmap::map::Entry as MapEntry;

use crate::error::{CatalogError, Result};
use crate::message::{Entry, ExtractedCatalog, ExtractedEntry, ExtractedMessage};
use crate::util::pretty_origin;

/// Fold the extraction fragment `next` into `acc`, combining records that
/// share an id. Ids present on only one side pass through untouched.
pub fn combine_catalogs(
    mut acc: ExtractedCatalog,
    next: ExtractedCatalog,
) -> Result<ExtractedCatalog> {
    for (id, next_entry) in next {
        match acc.entry(id) {
            MapEntry::Occupied(mut slot) => {
                let combined = combine_entries(slot.key().clone(), slot.get(), next_entry)?;
                slot.insert(combined);
            }
            MapEntry::Vacant(slot) => {
                slot.insert(next_entry);
            }
        }
    }
    Ok(acc)
}

fn combine_entries(
    id: String,
    prev: &ExtractedEntry,
    next: ExtractedEntry,
) -> Result<ExtractedEntry> {
    match (prev, next) {
        (Entry::Message(prev), Entry::Message(next)) => {
            Ok(Entry::Message(combine_messages(&id, prev, next)?))
        }
        (Entry::Context(prev), Entry::Context(next)) => {
            let mut combined = prev.clone();
            for (key, message) in next {
                match combined.entry(key) {
                    MapEntry::Occupied(mut slot) => {
                        let key = slot.key().clone();
                        let merged = combine_messages(&key, slot.get(), message)?;
                        slot.insert(merged);
                    }
                    MapEntry::Vacant(slot) => {
                        slot.insert(message);
                    }
                }
            }
            Ok(Entry::Context(combined))
        }
        _ => Err(CatalogError::ConflictingEntryShapes { id }),
    }
}

/// Two records for the same id: origins and extracted comments
/// concatenate (earlier record first), every other field follows the
/// later record.
fn combine_messages(
    id: &str,
    prev: &ExtractedMessage,
    mut next: ExtractedMessage,
) -> Result<ExtractedMessage> {
    if prev.defaults != next.defaults {
        return Err(CatalogError::ConflictingDefaults {
            id: id.to_string(),
            prev_defaults: prev.defaults.clone().unwrap_or_default(),
            next_defaults: next.defaults.clone().unwrap_or_default(),
            prev_origin: pretty_origin(&prev.origin),
            next_origin: pretty_origin(&next.origin),
        });
    }

    let mut origin = prev.origin.clone();
    origin.append(&mut next.origin);
    next.origin = origin;

    let mut extracted_comments = prev.extracted_comments.clone();
    extracted_comments.append(&mut next.extracted_comments);
    next.extracted_comments = extracted_comments;

    Ok(next)
}
