//! Shared helpers for origins and catalog files.

use crate::message::Origin;
use std::fs;
use std::io;
use std::path::Path;

/// Format an origin as `file:line`, or the bare file when no line is
/// tracked.
pub fn join_origin(origin: &Origin) -> String {
    match origin.line {
        Some(line) => format!("{}:{}", origin.file, line),
        None => origin.file.clone(),
    }
}

/// Parse a `file[:line]` reference back into an origin.
///
/// Only a purely numeric suffix after the last `:` counts as a line
/// number, so file names containing `:` survive a round-trip.
pub fn split_origin(reference: &str) -> Origin {
    if let Some((file, line)) = reference.rsplit_once(':') {
        if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(line) = line.parse() {
                return Origin::new(file, Some(line));
            }
        }
    }
    Origin::new(reference, None)
}

/// Render a list of origins for diagnostics: `a.js:1, b.js`.
pub fn pretty_origin(origins: &[Origin]) -> String {
    origins
        .iter()
        .map(join_origin)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write `contents` only when it differs from what is already on disk,
/// keeping timestamps stable across no-op runs. Returns whether a write
/// happened.
pub fn write_file_if_changed(path: &Path, contents: &str) -> io::Result<bool> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == contents => Ok(false),
        _ => {
            fs::write(path, contents)?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_origin_with_line_number() {
        assert_eq!(split_origin("src/app.js:12"), Origin::new("src/app.js", Some(12)));
    }

    #[test]
    fn split_origin_without_line_number() {
        assert_eq!(split_origin("src/app.js"), Origin::new("src/app.js", None));
    }

    #[test]
    fn split_origin_keeps_colons_in_file_names() {
        assert_eq!(
            split_origin("weird:file.js"),
            Origin::new("weird:file.js", None)
        );
        assert_eq!(
            split_origin("weird:file.js:3"),
            Origin::new("weird:file.js", Some(3))
        );
    }

    #[test]
    fn join_and_split_are_symmetric() {
        let origin = Origin::new("pages/home.js", Some(42));
        assert_eq!(split_origin(&join_origin(&origin)), origin);
    }
}
