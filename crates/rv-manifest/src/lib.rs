//! Parses a requirements manifest — one requirement per line, `#` comments,
//! blank lines ignored — into an ordered list of [`Requirement`]s. Reading
//! the manifest text from disk is the host's job; this crate only ever sees
//! the already-read string.

use std::str::FromStr;

use rv_version::{PackageName, Requirement, SpecifierParseError, VersionRange};

/// A manifest line that doesn't match `name ((<op> version)(,\s*<op> version)*)?`.
///
/// Carries the offending line's text and the byte span within it that
/// failed to parse, mirroring `Pep508Error`'s `start`/`len`/`input` fields
/// so a caller can render the same underlined-span diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum MalformedManifest {
    #[error("line {line}: missing package name: `{text}`")]
    MissingName {
        line: usize,
        text: String,
        start: usize,
        len: usize,
    },
    #[error("line {line}: {source}")]
    BadRange {
        line: usize,
        #[source]
        source: SpecifierParseError,
        text: String,
        start: usize,
        len: usize,
    },
}

impl MalformedManifest {
    /// Pretty-prints the offending line with the failing span underlined,
    /// the same layout `Pep508Error`'s `Display` impl produces.
    pub fn render(&self) -> String {
        let (text, start, len) = match self {
            Self::MissingName { text, start, len, .. } | Self::BadRange { text, start, len, .. } => {
                (text, *start, *len)
            }
        };
        format!("{self}\n{text}\n{}{}", " ".repeat(start), "^".repeat(len.max(1)))
    }
}

/// Parses a manifest blob into an ordered list of requirements.
///
/// Duplicate package names across separate lines are merged by intersecting
/// their ranges; an empty intersection is not an error here — it flows
/// downstream to an unsatisfiable resolution, per the pipeline's contract
/// that the solver reports unsat rather than the parser guessing why.
pub fn parse_requirements(manifest: &str) -> Result<Vec<Requirement>, MalformedManifest> {
    let mut order: Vec<PackageName> = Vec::new();
    let mut merged: Vec<(PackageName, VersionRange)> = Vec::new();

    for (line_no, raw_line) in manifest.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (name, range) = parse_line(line, line_no + 1)?;

        if let Some((_, existing_range)) = merged.iter_mut().find(|(existing, _)| existing == &name) {
            *existing_range = existing_range.intersect(&range);
        } else {
            order.push(name.clone());
            merged.push((name, range));
        }
    }

    Ok(order
        .into_iter()
        .map(|name| {
            let range = merged
                .iter()
                .find(|(existing, _)| existing == &name)
                .map(|(_, range)| range.clone())
                .unwrap_or_default();
            Requirement::new(name, range)
        })
        .collect())
}

/// Splits a single line into its package name and the range formed by the
/// intersection of its comma-separated operators.
fn parse_line(line: &str, line_no: usize) -> Result<(PackageName, VersionRange), MalformedManifest> {
    let split_at = line
        .find(|c: char| "=!<>~".contains(c))
        .unwrap_or(line.len());
    let (name_part, range_part) = line.split_at(split_at);

    let name = name_part.trim();
    if name.is_empty() {
        return Err(MalformedManifest::MissingName {
            line: line_no,
            text: line.to_string(),
            start: 0,
            len: split_at.max(1),
        });
    }

    let range = VersionRange::from_str(range_part).map_err(|source| MalformedManifest::BadRange {
        line: line_no,
        source,
        text: line.to_string(),
        start: split_at,
        len: range_part.len().max(1),
    })?;

    Ok((PackageName::new(name), range))
}
