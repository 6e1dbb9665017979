//! PO catalog formatter.
//!
//! Maps catalogs onto PO documents: context buckets become
//! `msgctxt`-tagged items, origins become `#:` references, and obsolete
//! messages keep their `#~` marking. The header block of an existing
//! file survives a rewrite; new files get a standard header set.

use chrono::Local;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use super::po_file::{PoFile, PoItem};
use super::{CatalogFormat, FormatOptions};
use crate::error::Result;
use crate::message::{Catalog, CatalogMessage, Entry};
use crate::util::{join_origin, split_origin, write_file_if_changed};

const GENERATOR: &str = concat!("lingua-cli ", env!("CARGO_PKG_VERSION"));

pub struct PoFormat;

impl CatalogFormat for PoFormat {
    fn catalog_extension(&self) -> &'static str {
        ".po"
    }

    fn write(&self, path: &Path, catalog: &Catalog, options: &FormatOptions) -> Result<()> {
        let mut po = if path.exists() {
            let raw = fs::read_to_string(path)?;
            let mut existing = PoFile::parse(&raw)?;
            existing.items.clear();
            existing
        } else {
            PoFile::default()
        };
        // Standard headers are merged in; whatever the file already
        // declares wins.
        for (key, value) in create_headers(options.locale.as_deref()) {
            po.headers.entry(key).or_insert(value);
        }
        po.items = serialize(catalog, options);
        write_file_if_changed(path, &po.to_string())?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Catalog> {
        let raw = fs::read_to_string(path)?;
        self.parse(&raw)
    }
}

impl PoFormat {
    /// Parse raw PO text into a catalog.
    pub fn parse(&self, raw: &str) -> Result<Catalog> {
        let po = PoFile::parse(raw)?;
        Ok(deserialize(po.items))
    }
}

fn create_headers(locale: Option<&str>) -> IndexMap<String, String> {
    let mut headers = IndexMap::new();
    headers.insert(
        "POT-Creation-Date".to_string(),
        Local::now().format("%Y-%m-%d %H:%M%z").to_string(),
    );
    headers.insert("MIME-Version".to_string(), "1.0".to_string());
    headers.insert(
        "Content-Type".to_string(),
        "text/plain; charset=utf-8".to_string(),
    );
    headers.insert("Content-Transfer-Encoding".to_string(), "8bit".to_string());
    headers.insert("X-Generator".to_string(), GENERATOR.to_string());
    if let Some(locale) = locale {
        headers.insert("Language".to_string(), locale.to_string());
    }
    headers
}

fn serialize(catalog: &Catalog, options: &FormatOptions) -> Vec<PoItem> {
    let mut items = Vec::new();
    for (key, entry) in catalog {
        match entry {
            Entry::Message(message) => items.push(serialize_item(key, message, None, options)),
            Entry::Context(bucket) => {
                for (item_key, message) in bucket {
                    items.push(serialize_item(item_key, message, Some(key), options));
                }
            }
        }
    }
    items
}

fn serialize_item(
    key: &str,
    message: &CatalogMessage,
    context: Option<&str>,
    options: &FormatOptions,
) -> PoItem {
    let references = if !options.origins {
        Vec::new()
    } else if options.line_numbers {
        message.origin.iter().map(join_origin).collect()
    } else {
        message.origin.iter().map(|origin| origin.file.clone()).collect()
    };
    PoItem {
        msgid: key.to_string(),
        msgctxt: message
            .context
            .clone()
            .or_else(|| context.map(str::to_string)),
        msgid_plural: None,
        msgstr: vec![message.translation.clone()],
        comments: message.comments.clone(),
        extracted_comments: message.extracted_comments.clone(),
        references,
        flags: message.flags.clone(),
        obsolete: message.obsolete,
    }
}

fn deserialize(items: Vec<PoItem>) -> Catalog {
    let mut catalog = Catalog::new();
    for item in items {
        let (key, context, message) = deserialize_item(item);
        match context {
            Some(context) => {
                let entry = catalog
                    .entry(context)
                    .or_insert_with(|| Entry::Context(IndexMap::new()));
                if let Entry::Context(bucket) = entry {
                    bucket.insert(key, message);
                }
            }
            None => {
                catalog.insert(key, Entry::Message(message));
            }
        }
    }
    catalog
}

fn deserialize_item(item: PoItem) -> (String, Option<String>, CatalogMessage) {
    if item.msgstr.len() > 1 {
        warn!(
            key = %item.msgid,
            "multiple translations for one message are not supported; keeping the first"
        );
    }
    let PoItem {
        msgid,
        msgctxt,
        msgstr,
        comments,
        extracted_comments,
        references,
        flags,
        obsolete: entry_obsolete,
        ..
    } = item;

    // A legacy `obsolete` flag counts too, and is not kept in the flag
    // list.
    let obsolete = entry_obsolete || flags.iter().any(|flag| flag == "obsolete");
    let flags = flags.into_iter().filter(|flag| flag != "obsolete").collect();

    let message = CatalogMessage {
        translation: msgstr.into_iter().next().unwrap_or_default(),
        defaults: None,
        origin: references.iter().map(|reference| split_origin(reference)).collect(),
        extracted_comments,
        comments,
        obsolete,
        flags,
        context: None,
    };
    (msgid, msgctxt, message)
}
