use once_cell::sync::Lazy;
use regex::Regex;

use citelink_core::{Citation, IdAllocator, SkipStats, Span};

/// A parenthesized group running from `(` to the first following `)`.
static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

/// `Author[s], YYYY` at the start of a clause.
static AUTHOR_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\p{Lu}[\p{L}\s.,&]+?),\s*([0-9]{4})").unwrap());

static AUTHOR_SEP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",|&| and ").unwrap());

/// `[n]` or `[n1, n2, ...]`.
static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([0-9]+(?:,\s*[0-9]+)*)\]").unwrap());

/// A parenthesized group: byte offset of `(` and its interior text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParenGroup<'a> {
    pub open: usize,
    pub interior: &'a str,
}

/// Every top-level `(...)` group in `body`, left to right.
///
/// A group ends at the first `)`, so an inner `(` belongs to the outer
/// group's interior and text after the inner `)` is not part of any group.
pub fn find_paren_groups(body: &str) -> Vec<ParenGroup<'_>> {
    PAREN_RE
        .captures_iter(body)
        .map(|caps| {
            let whole = caps.get(0).unwrap();
            ParenGroup {
                open: whole.start(),
                interior: caps.get(1).unwrap().as_str(),
            }
        })
        .collect()
}

/// Split a group's interior into `;`-separated clauses (untrimmed).
pub fn split_clauses(interior: &str) -> impl Iterator<Item = &str> {
    interior.split(';')
}

/// Whether the clause opens with an uppercase letter.
///
/// Filters lowercase asides such as `(see below)` or `(however, 2012 data)`.
pub fn starts_capitalized(clause: &str) -> bool {
    clause.chars().next().is_some_and(char::is_uppercase)
}

/// Match a trimmed clause against `Author[s], YYYY`.
///
/// Returns the author text (everything before the comma preceding the year)
/// and the year.
pub fn match_author_year(clause: &str) -> Option<(&str, u32)> {
    if !starts_capitalized(clause) {
        return None;
    }
    let caps = AUTHOR_YEAR_RE.captures(clause)?;
    let authors = caps.get(1)?.as_str();
    let year = caps.get(2)?.as_str().parse().ok()?;
    Some((authors, year))
}

/// Remove the first literal `" et al."` from an author string.
pub fn strip_et_al(authors: &str) -> String {
    authors.replacen(" et al.", "", 1)
}

/// Split in-text author text on `,`, `&` or `" and "` into trimmed, non-empty tokens.
pub fn split_in_text_authors(authors: &str) -> Vec<String> {
    AUTHOR_SEP_RE
        .split(authors)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Author tokens for an in-text mention: `et al.` stripped, then split.
pub fn parse_in_text_authors(authors: &str) -> Vec<String> {
    split_in_text_authors(&strip_et_al(authors))
}

/// Parenthetical author-year pass.
///
/// Each accepted clause becomes one citation whose span covers exactly the
/// trimmed clause. Clause positions are searched forward from the previous
/// accepted clause in the same group, so repeated clauses get distinct spans.
pub fn extract_parenthetical(
    body: &str,
    ids: &mut IdAllocator,
    stats: &mut SkipStats,
) -> Vec<Citation> {
    let mut citations = Vec::new();

    for group in find_paren_groups(body) {
        let mut cursor = 0;

        for clause in split_clauses(group.interior) {
            let clause = clause.trim();
            let Some((authors_text, year)) = match_author_year(clause) else {
                tracing::trace!(clause, "not an author-year clause");
                stats.rejected_clauses += 1;
                continue;
            };

            let Some(offset) = group.interior[cursor..]
                .find(clause)
                .map(|pos| pos + cursor)
            else {
                continue;
            };
            cursor = offset + clause.len();

            let start = group.open + 1 + offset;
            citations.push(Citation::in_text(
                ids.next_in_text(),
                clause,
                parse_in_text_authors(authors_text),
                year,
                Span::new(start, clause.len()),
            ));
        }
    }

    citations
}

/// Bracketed numeric pass.
///
/// Emits one citation per number with no authors and year `0`. Every number
/// in a group is given the span of the whole bracket group, so `raw_text`
/// (`"[n]"`) differs from the spanned text for multi-number groups.
pub fn extract_numeric(body: &str, ids: &mut IdAllocator) -> Vec<Citation> {
    let mut citations = Vec::new();

    for caps in NUMERIC_RE.captures_iter(body) {
        let whole = caps.get(0).unwrap();
        let span = Span::new(whole.start(), whole.len());

        for number in caps.get(1).unwrap().as_str().split(',') {
            citations.push(Citation::in_text(
                ids.next_numeric(),
                format!("[{}]", number.trim()),
                Vec::new(),
                0,
                span,
            ));
        }
    }

    citations
}

#[cfg(test)]
mod tests {
    use super::*;
    use citelink_core::MatchStatus;

    #[test]
    fn test_find_paren_groups() {
        let groups = find_paren_groups("a (Siler, 2012) b (x; y) c ()");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].open, 2);
        assert_eq!(groups[0].interior, "Siler, 2012");
        assert_eq!(groups[1].interior, "x; y");
    }

    #[test]
    fn test_find_paren_groups_outer_group_wins() {
        let groups = find_paren_groups("(Smith, 2010 (reprinted)) and (see (Siler, 2012) here)");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].open, 0);
        assert_eq!(groups[0].interior, "Smith, 2010 (reprinted");
        assert_eq!(groups[1].interior, "see (Siler, 2012");
    }

    #[test]
    fn test_extract_parenthetical_nested_paren() {
        let body = "(Smith, 2010; cf. the survey (Jones, 2011))";
        let mut ids = IdAllocator::new();
        let mut stats = SkipStats::default();
        let cites = extract_parenthetical(body, &mut ids, &mut stats);
        assert_eq!(cites.len(), 1);
        assert_eq!(cites[0].raw_text, "Smith, 2010");
        assert_eq!(cites[0].span.slice(body), Some("Smith, 2010"));
        assert_eq!(stats.rejected_clauses, 1);
    }

    #[test]
    fn test_starts_capitalized() {
        assert!(starts_capitalized("Siler, 2012"));
        assert!(starts_capitalized("Ødegaard, 2019"));
        assert!(!starts_capitalized("however, 2012"));
        assert!(!starts_capitalized("2012"));
        assert!(!starts_capitalized(""));
    }

    #[test]
    fn test_match_author_year() {
        assert_eq!(match_author_year("Siler, 2012"), Some(("Siler", 2012)));
        assert_eq!(
            match_author_year("Slyder et al., 2011"),
            Some(("Slyder et al.", 2011))
        );
        assert_eq!(
            match_author_year("Smith, Jones, 2020"),
            Some(("Smith, Jones", 2020))
        );
        assert_eq!(
            match_author_year("Siler, 2012, p. 4"),
            Some(("Siler", 2012))
        );
    }

    #[test]
    fn test_match_author_year_rejects() {
        assert_eq!(match_author_year("see Siler, 2012"), None);
        assert_eq!(match_author_year("Siler 2012"), None);
        assert_eq!(match_author_year("Figure 3"), None);
        assert_eq!(match_author_year("Siler, 12"), None);
    }

    #[test]
    fn test_strip_et_al_first_only() {
        assert_eq!(strip_et_al("Slyder et al."), "Slyder");
        assert_eq!(
            strip_et_al("Smith et al. & Jones et al."),
            "Smith & Jones et al."
        );
        assert_eq!(strip_et_al("Slyder"), "Slyder");
    }

    #[test]
    fn test_split_in_text_authors() {
        assert_eq!(split_in_text_authors("Smith & Jones"), vec!["Smith", "Jones"]);
        assert_eq!(
            split_in_text_authors("Smith, Jones and Lee"),
            vec!["Smith", "Jones", "Lee"]
        );
        assert_eq!(split_in_text_authors("Smith, , "), vec!["Smith"]);
    }

    #[test]
    fn test_parse_in_text_authors_et_al() {
        assert_eq!(parse_in_text_authors("Slyder et al."), vec!["Slyder"]);
    }

    #[test]
    fn test_extract_parenthetical_multi_clause() {
        let body = "Prior work (Siler, 2012; Hyland, 2015) shows this.";
        let mut ids = IdAllocator::new();
        let mut stats = SkipStats::default();
        let cites = extract_parenthetical(body, &mut ids, &mut stats);
        assert_eq!(cites.len(), 2);
        assert_eq!(cites[0].id, "intext-0");
        assert_eq!(cites[1].id, "intext-1");
        for c in &cites {
            assert_eq!(c.span.slice(body), Some(c.raw_text.as_str()));
            assert_eq!(c.match_status, MatchStatus::Pending);
        }
        assert_eq!(cites[1].raw_text, "Hyland, 2015");
        assert_eq!(cites[1].authors, vec!["Hyland"]);
        assert_eq!(cites[1].year, 2015);
        assert_eq!(stats.rejected_clauses, 0);
    }

    #[test]
    fn test_extract_parenthetical_duplicate_clauses() {
        let body = "(Siler, 2012; Siler, 2012)";
        let mut ids = IdAllocator::new();
        let mut stats = SkipStats::default();
        let cites = extract_parenthetical(body, &mut ids, &mut stats);
        assert_eq!(cites.len(), 2);
        assert_eq!(cites[0].span.start, 1);
        assert_eq!(cites[1].span.start, 14);
        assert_eq!(cites[1].span.slice(body), Some("Siler, 2012"));
    }

    #[test]
    fn test_extract_parenthetical_keeps_whole_clause_as_raw_text() {
        let body = "(Siler, 2012, p. 4)";
        let mut ids = IdAllocator::new();
        let mut stats = SkipStats::default();
        let cites = extract_parenthetical(body, &mut ids, &mut stats);
        assert_eq!(cites[0].raw_text, "Siler, 2012, p. 4");
        assert_eq!(cites[0].span, Span::new(1, 17));
    }

    #[test]
    fn test_extract_parenthetical_counts_rejections() {
        let body = "It works (mostly) and (see Figure 2; Siler, 2012).";
        let mut ids = IdAllocator::new();
        let mut stats = SkipStats::default();
        let cites = extract_parenthetical(body, &mut ids, &mut stats);
        assert_eq!(cites.len(), 1);
        assert_eq!(stats.rejected_clauses, 2);
    }

    #[test]
    fn test_extract_parenthetical_multibyte_offsets() {
        let body = "Résumé (Ødegaard & Müller, 2019).";
        let mut ids = IdAllocator::new();
        let mut stats = SkipStats::default();
        let cites = extract_parenthetical(body, &mut ids, &mut stats);
        assert_eq!(cites.len(), 1);
        assert_eq!(cites[0].span.slice(body), Some("Ødegaard & Müller, 2019"));
        assert_eq!(cites[0].authors, vec!["Ødegaard", "Müller"]);
    }

    #[test]
    fn test_extract_numeric_group_span() {
        let body = "As shown [1, 2] and [3].";
        let mut ids = IdAllocator::new();
        let cites = extract_numeric(body, &mut ids);
        assert_eq!(cites.len(), 3);
        assert_eq!(cites[0].id, "intext-num-0");
        assert_eq!(cites[0].raw_text, "[1]");
        assert_eq!(cites[1].raw_text, "[2]");
        // both numbers of the first group share the group's span
        assert_eq!(cites[0].span, cites[1].span);
        assert_eq!(cites[0].span.slice(body), Some("[1, 2]"));
        assert_eq!(cites[2].span.slice(body), Some("[3]"));
        assert!(cites.iter().all(|c| c.authors.is_empty() && c.year == 0));
    }

    #[test]
    fn test_extract_numeric_ignores_non_numeric_brackets() {
        let mut ids = IdAllocator::new();
        assert!(extract_numeric("[a] [1-3] [] [1,]", &mut ids).is_empty());
    }
}
