use crate::{Citation, CitationKind, CitationMetadata, MatchStatus};

/// Whether any token of `a` and any token of `b` contain one another.
///
/// Case-sensitive, either direction, so `"Slyder"` links to `"Slyder et al"`.
/// Empty tokens never match.
pub fn authors_overlap(a: &[String], b: &[String]) -> bool {
    a.iter().filter(|x| !x.is_empty()).any(|x| {
        b.iter()
            .filter(|y| !y.is_empty())
            .any(|y| x.contains(y.as_str()) || y.contains(x.as_str()))
    })
}

/// Whether `reference` can resolve `in_text`: same year and overlapping authors.
pub fn is_candidate(in_text: &Citation, reference: &Citation) -> bool {
    in_text.year == reference.year && authors_overlap(&in_text.authors, &reference.authors)
}

/// Tally of one [`cross_reference`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    pub matched: usize,
    pub missing: usize,
    /// Numeric citations, which carry no authors and are left pending.
    pub unresolvable: usize,
}

/// Link in-text citations to reference entries within one arena.
///
/// For each in-text citation with authors, the first reference (in arena
/// order) passing [`is_candidate`] wins; both sides become `Matched` and the
/// reference's bibliographic fields are copied into the citation's metadata.
/// A citation with no candidate becomes `Missing`. A reference may be matched
/// by any number of citations.
pub fn cross_reference(arena: &mut [Citation]) -> MatchOutcome {
    let references: Vec<usize> = arena
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind == CitationKind::Reference)
        .map(|(i, _)| i)
        .collect();

    let mut outcome = MatchOutcome::default();

    for i in 0..arena.len() {
        if arena[i].kind != CitationKind::InText {
            continue;
        }
        if arena[i].authors.is_empty() {
            outcome.unresolvable += 1;
            continue;
        }

        let found = references
            .iter()
            .copied()
            .find(|&r| is_candidate(&arena[i], &arena[r]));

        match found {
            Some(r) => {
                arena[r].match_status = MatchStatus::Matched;
                let metadata = CitationMetadata::from_reference(&arena[r]);
                tracing::trace!(citation = %arena[i].id, reference = %arena[r].id, "matched");
                arena[i].match_status = MatchStatus::Matched;
                arena[i].metadata = Some(metadata);
                outcome.matched += 1;
            }
            None => {
                arena[i].match_status = MatchStatus::Missing;
                tracing::trace!(citation = %arena[i].id, "no reference entry");
                outcome.missing += 1;
            }
        }
    }

    outcome
}
