use once_cell::sync::Lazy;
use regex::Regex;

use citelink_core::{Citation, IdAllocator, SkipStats, Span};

use crate::config::ParsingConfig;
use crate::identifiers;

static YEAR_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([0-9]{4})\)").unwrap());

/// Position of the first `(YYYY)` in a reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMarker {
    /// Byte offset of `(`.
    pub start: usize,
    /// Byte offset just past `)`.
    pub end: usize,
    pub year: u32,
}

pub fn find_year_marker(line: &str) -> Option<YearMarker> {
    let caps = YEAR_MARKER_RE.captures(line)?;
    let whole = caps.get(0)?;
    Some(YearMarker {
        start: whole.start(),
        end: whole.end(),
        year: caps.get(1)?.as_str().parse().ok()?,
    })
}

/// Split the author part of a reference on `,` or `&`.
///
/// Each token is trimmed and loses one trailing period, so `"Siler, K."`
/// becomes `["Siler", "K"]`.
pub fn split_reference_authors(authors: &str) -> Vec<String> {
    authors
        .split([',', '&'])
        .map(str::trim)
        .map(|a| a.strip_suffix('.').unwrap_or(a))
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text following the year marker, trimmed, with one leading `.` removed.
pub fn text_after_year<'a>(line: &'a str, marker: &YearMarker) -> &'a str {
    let rest = line[marker.end..].trim();
    match rest.strip_prefix('.') {
        Some(stripped) => stripped.trim(),
        None => rest,
    }
}

/// Split the text after the year into the title and what follows it.
///
/// The title runs up to the first `.`. Without a period (or when the text
/// opens with one), the whole text is the title.
pub fn split_title(rest: &str) -> (&str, &str) {
    match rest.find('.') {
        Some(dot) if dot > 0 => (rest[..dot].trim(), &rest[dot + 1..]),
        _ => (rest, ""),
    }
}

/// Venue name from the text following the title.
///
/// Takes the segment up to the next `.` or `,`. Volume numbers, page ranges,
/// DOIs and URLs are not journal names.
pub fn extract_journal(after_title: &str) -> Option<String> {
    let text = after_title.trim();
    if text.is_empty() || identifiers::starts_with_identifier(text) {
        return None;
    }
    let end = text.find(['.', ',']).unwrap_or(text.len());
    let segment = text[..end].trim();
    if !segment.chars().next().is_some_and(char::is_alphabetic) {
        return None;
    }
    Some(segment.to_string())
}

/// Reference-list pass over the reference region.
///
/// `region_start` is the region's byte offset in the full document; spans are
/// absolute. Lines without a `(YYYY)` marker are skipped. Ids use the line's
/// index among all non-empty lines, so skipped lines leave gaps.
pub(crate) fn extract_references_with_config(
    region: &str,
    region_start: usize,
    config: &ParsingConfig,
    stats: &mut SkipStats,
) -> Vec<Citation> {
    let mut references = Vec::new();
    let mut cursor = 0;

    let lines = region.split('\n').filter(|l| !l.trim().is_empty());
    for (index, line) in lines.enumerate() {
        let Some(marker) = find_year_marker(line) else {
            tracing::trace!(line, "no year marker");
            stats.unmarked_lines += 1;
            continue;
        };

        let Some(offset) = region[cursor..].find(line).map(|pos| pos + cursor) else {
            continue;
        };
        cursor = offset + line.len();

        let authors = split_reference_authors(line[..marker.start].trim());
        let (title, after_title) = split_title(text_after_year(line, &marker));

        let mut reference = Citation::reference(
            IdAllocator::reference(index),
            line,
            authors,
            marker.year,
            Span::new(region_start + offset, line.len()),
        );
        reference.title = (!title.is_empty()).then(|| title.to_string());
        reference.journal = extract_journal(after_title);
        reference.doi = identifiers::extract_doi_with_config(line, config);
        references.push(reference);
    }

    references
}

/// [`extract_references_with_config`] with the default configuration.
pub fn extract_references(
    region: &str,
    region_start: usize,
    stats: &mut SkipStats,
) -> Vec<Citation> {
    extract_references_with_config(region, region_start, &ParsingConfig::default(), stats)
}
