//! Low-level PO document codec.
//!
//! Parses and prints gettext-style PO files: the comment classes (`# `
//! translator, `#.` extracted, `#:` references, `#,` flags), `msgctxt` /
//! `msgid` / `msgstr` directives with quoted-string continuation lines,
//! C-style escapes, and the `#~` prefix marking obsolete entries. The
//! header entry (empty msgid) is lifted out into an ordered key/value
//! map.

use indexmap::IndexMap;
use std::fmt;

use crate::error::{CatalogError, Result};

/// One PO entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoItem {
    pub msgid: String,
    pub msgctxt: Option<String>,
    /// Plural source text. Parsed for tolerance; the catalog model does
    /// not use it.
    pub msgid_plural: Option<String>,
    /// Stored translations; well-formed singular entries carry exactly
    /// one.
    pub msgstr: Vec<String>,
    /// Translator comments.
    pub comments: Vec<String>,
    /// Extracted comments.
    pub extracted_comments: Vec<String>,
    /// Source references, one `file[:line]` token each.
    pub references: Vec<String>,
    pub flags: Vec<String>,
    /// Entry retired from current sources.
    pub obsolete: bool,
}

/// A parsed PO document: ordered headers plus entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoFile {
    pub headers: IndexMap<String, String>,
    /// Comments attached to the header entry.
    pub header_comments: Vec<String>,
    pub items: Vec<PoItem>,
}

impl PoFile {
    pub fn parse(raw: &str) -> Result<PoFile> {
        let mut parser = Parser::default();
        for (index, line) in raw.lines().enumerate() {
            parser.line(index + 1, line)?;
        }
        parser.finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Field {
    #[default]
    None,
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr(usize),
}

#[derive(Default)]
struct Parser {
    file: PoFile,
    current: PoItem,
    field: Field,
    saw_msgid: bool,
}

impl Parser {
    fn line(&mut self, number: usize, raw_line: &str) -> Result<()> {
        let mut line = raw_line.trim_end();
        let mut obsolete = false;
        if let Some(rest) = line.strip_prefix("#~") {
            obsolete = true;
            line = rest.trim_start();
        }

        if line.is_empty() {
            self.flush();
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("#:") {
            self.comment_boundary();
            self.current
                .references
                .extend(rest.split_whitespace().map(String::from));
        } else if let Some(rest) = line.strip_prefix("#.") {
            self.comment_boundary();
            self.current.extracted_comments.push(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("#,") {
            self.comment_boundary();
            self.current.flags.extend(
                rest.split(',')
                    .map(|flag| flag.trim().to_string())
                    .filter(|flag| !flag.is_empty()),
            );
        } else if line.starts_with("#|") {
            // Previous-msgid comments are tolerated and dropped.
        } else if let Some(rest) = line.strip_prefix('#') {
            self.comment_boundary();
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            self.current.comments.push(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("msgctxt") {
            if self.saw_msgid {
                self.flush();
            }
            self.current.msgctxt = Some(parse_string(number, rest)?);
            self.field = Field::Msgctxt;
        } else if let Some(rest) = line.strip_prefix("msgid_plural") {
            self.current.msgid_plural = Some(parse_string(number, rest)?);
            self.field = Field::MsgidPlural;
        } else if let Some(rest) = line.strip_prefix("msgid") {
            if self.saw_msgid {
                self.flush();
            }
            self.current.msgid = parse_string(number, rest)?;
            self.saw_msgid = true;
            self.field = Field::Msgid;
        } else if let Some(rest) = line.strip_prefix("msgstr") {
            let rest = rest.trim_start();
            let (index, rest) = if let Some(rest) = rest.strip_prefix('[') {
                let close = rest
                    .find(']')
                    .ok_or_else(|| malformed(number, "unterminated msgstr index"))?;
                let index = rest[..close]
                    .parse::<usize>()
                    .map_err(|_| malformed(number, "invalid msgstr index"))?;
                (index, &rest[close + 1..])
            } else {
                (0, rest)
            };
            let value = parse_string(number, rest)?;
            if self.current.msgstr.len() <= index {
                self.current.msgstr.resize(index + 1, String::new());
            }
            self.current.msgstr[index] = value;
            self.field = Field::Msgstr(index);
        } else if line.starts_with('"') {
            let value = parse_string(number, line)?;
            match self.field {
                Field::Msgctxt => {
                    if let Some(msgctxt) = &mut self.current.msgctxt {
                        msgctxt.push_str(&value);
                    }
                }
                Field::Msgid => self.current.msgid.push_str(&value),
                Field::MsgidPlural => {
                    if let Some(plural) = &mut self.current.msgid_plural {
                        plural.push_str(&value);
                    }
                }
                Field::Msgstr(index) => {
                    if let Some(slot) = self.current.msgstr.get_mut(index) {
                        slot.push_str(&value);
                    }
                }
                Field::None => {
                    return Err(malformed(number, "string continuation without a directive"))
                }
            }
        } else if line.starts_with("domain") {
            // Domain directives are tolerated and dropped.
        } else {
            return Err(malformed(number, &format!("unexpected input {line:?}")));
        }

        // Applied after any boundary flush above, so the marker lands on
        // the entry this line belongs to.
        if obsolete {
            self.current.obsolete = true;
        }

        Ok(())
    }

    // A comment after a completed entry opens the next one.
    fn comment_boundary(&mut self) {
        if self.saw_msgid && matches!(self.field, Field::Msgstr(_)) {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.saw_msgid {
            self.file.items.push(std::mem::take(&mut self.current));
        } else {
            self.current = PoItem::default();
        }
        self.field = Field::None;
        self.saw_msgid = false;
    }

    fn finish(mut self) -> Result<PoFile> {
        self.flush();
        // The header is the first live entry with an empty id and no
        // context.
        let header_position = self
            .file
            .items
            .iter()
            .position(|item| item.msgid.is_empty() && item.msgctxt.is_none() && !item.obsolete);
        if let Some(position) = header_position {
            let header = self.file.items.remove(position);
            self.file.header_comments = header.comments;
            self.file.headers =
                parse_headers(header.msgstr.first().map(String::as_str).unwrap_or(""));
        }
        Ok(self.file)
    }
}

fn parse_headers(raw: &str) -> IndexMap<String, String> {
    let mut headers = IndexMap::new();
    for line in raw.lines() {
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    headers
}

fn parse_string(line: usize, rest: &str) -> Result<String> {
    let rest = rest.trim();
    let inner = rest
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .ok_or_else(|| malformed(line, "expected a quoted string"))?;
    unescape(line, inner)
}

fn unescape(line: usize, input: &str) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some('r') => output.push('\r'),
            Some('"') => output.push('"'),
            Some('\\') => output.push('\\'),
            Some('0') => output.push('\0'),
            Some(other) => return Err(malformed(line, &format!("invalid escape \\{other}"))),
            None => return Err(malformed(line, "dangling escape at end of string")),
        }
    }
    Ok(output)
}

fn escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => output.push_str("\\\\"),
            '"' => output.push_str("\\\""),
            '\n' => output.push_str("\\n"),
            '\t' => output.push_str("\\t"),
            '\r' => output.push_str("\\r"),
            '\0' => output.push_str("\\0"),
            other => output.push(other),
        }
    }
    output
}

fn malformed(line: usize, message: &str) -> CatalogError {
    CatalogError::Po {
        line,
        message: message.to_string(),
    }
}

impl fmt::Display for PoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for comment in &self.header_comments {
            writeln!(f, "# {comment}")?;
        }
        writeln!(f, "msgid \"\"")?;
        let header_block: String = self
            .headers
            .iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect();
        write_directive(f, "", "msgstr", &header_block)?;
        for item in &self.items {
            writeln!(f)?;
            write_item(f, item)?;
        }
        Ok(())
    }
}

fn write_item(f: &mut fmt::Formatter<'_>, item: &PoItem) -> fmt::Result {
    let prefix = if item.obsolete { "#~ " } else { "" };
    for comment in &item.comments {
        writeln!(f, "{prefix}# {comment}")?;
    }
    for comment in &item.extracted_comments {
        writeln!(f, "{prefix}#. {comment}")?;
    }
    if !item.references.is_empty() {
        writeln!(f, "{prefix}#: {}", item.references.join(" "))?;
    }
    if !item.flags.is_empty() {
        writeln!(f, "{prefix}#, {}", item.flags.join(", "))?;
    }
    if let Some(msgctxt) = &item.msgctxt {
        write_directive(f, prefix, "msgctxt", msgctxt)?;
    }
    write_directive(f, prefix, "msgid", &item.msgid)?;
    if let Some(plural) = &item.msgid_plural {
        write_directive(f, prefix, "msgid_plural", plural)?;
    }
    match item.msgstr.len() {
        0 => write_directive(f, prefix, "msgstr", "")?,
        1 => write_directive(f, prefix, "msgstr", &item.msgstr[0])?,
        _ => {
            for (index, value) in item.msgstr.iter().enumerate() {
                write_directive(f, prefix, &format!("msgstr[{index}]"), value)?;
            }
        }
    }
    Ok(())
}

// Multi-line values use the conventional empty first string with one
// quoted segment per line.
fn write_directive(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    keyword: &str,
    value: &str,
) -> fmt::Result {
    if value.contains('\n') {
        writeln!(f, "{prefix}{keyword} \"\"")?;
        for segment in value.split_inclusive('\n') {
            writeln!(f, "{prefix}\"{}\"", escape(segment))?;
        }
        Ok(())
    } else {
        writeln!(f, "{prefix}{keyword} \"{}\"", escape(value))
    }
}
