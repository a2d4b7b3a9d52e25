use citelink_core::{Citation, IdAllocator, MatchStatus, ParseResult, SkipStats, cross_reference};

use crate::config::ParsingConfig;
use crate::section::{self, Sections};
use crate::{in_text, references};

/// A configurable citation extraction pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use [`CitationExtractor::with_config`]
/// to supply custom patterns. The extractor keeps no state between calls, so
/// one instance can parse any number of documents from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct CitationExtractor {
    config: ParsingConfig,
}

impl CitationExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Split the document into body and reference region (step 1).
    pub fn split_sections<'a>(&self, text: &'a str) -> Sections<'a> {
        section::split_sections_with_config(text, &self.config)
    }

    /// Extract in-text citations from the body (step 2).
    ///
    /// Parenthetical results come first, then numeric ones.
    pub fn extract_in_text(
        &self,
        body: &str,
        ids: &mut IdAllocator,
        stats: &mut SkipStats,
    ) -> Vec<Citation> {
        let mut citations = in_text::extract_parenthetical(body, ids, stats);
        if self.config.numeric_citations {
            citations.extend(in_text::extract_numeric(body, ids));
        }
        citations
    }

    /// Extract reference entries from the reference region (step 3).
    pub fn extract_references(
        &self,
        sections: &Sections<'_>,
        stats: &mut SkipStats,
    ) -> Vec<Citation> {
        if !sections.has_references() {
            tracing::debug!("no reference section found");
            return Vec::new();
        }
        references::extract_references_with_config(
            sections.references,
            sections.references_start,
            &self.config,
            stats,
        )
    }

    /// Run the full pipeline on a document.
    pub fn parse(&self, text: &str) -> ParseResult {
        let sections = self.split_sections(text);
        let mut ids = IdAllocator::new();
        let mut skip_stats = SkipStats::default();

        // In-text and reference citations share one arena; the matcher works on indices.
        let mut arena = self.extract_in_text(sections.body, &mut ids, &mut skip_stats);
        // every in-text citation consumes exactly one id
        let total_in_text = ids.issued();
        arena.extend(self.extract_references(&sections, &mut skip_stats));
        let total_references = arena.len() - total_in_text;

        let outcome = cross_reference(&mut arena);

        let missing_citations: Vec<Citation> = arena
            .iter()
            .filter(|c| c.is_in_text() && c.match_status == MatchStatus::Missing)
            .cloned()
            .collect();
        let unused_references: Vec<Citation> = arena
            .iter()
            .filter(|c| c.is_reference() && c.match_status == MatchStatus::Unused)
            .cloned()
            .collect();

        tracing::debug!(
            in_text = total_in_text,
            references = total_references,
            matched = outcome.matched,
            missing = outcome.missing,
            unresolvable = outcome.unresolvable,
            unused = unused_references.len(),
            rejected_clauses = skip_stats.rejected_clauses,
            unmarked_lines = skip_stats.unmarked_lines,
            "parsed citations"
        );

        ParseResult {
            citations: arena,
            missing_citations,
            unused_references,
            total_in_text,
            total_references,
            skip_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;
    use citelink_core::CitationKind;

    const DOC: &str = "Prior work (Slyder et al., 2011; Hyland, 2015) and [1].\n\nReferences\nSlyder, J. B. (2011). Forest change. Ecology.\nDoe, J. (2020). Title. Journal.\n";

    #[test]
    fn test_extractor_split_sections() {
        let ext = CitationExtractor::new();
        let s = ext.split_sections(DOC);
        assert!(s.body.ends_with("[1].\n\n"));
        assert!(s.references.starts_with("Slyder, J. B."));
    }

    #[test]
    fn test_extractor_full_pipeline() {
        let result = CitationExtractor::new().parse(DOC);
        assert_eq!(result.total_in_text, 3);
        assert_eq!(result.total_references, 2);
        assert_eq!(result.citations.len(), 5);

        let ids: Vec<&str> = result.citations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["intext-0", "intext-1", "intext-num-2", "ref-0", "ref-1"]);

        let slyder = result.find("intext-0").unwrap();
        assert_eq!(slyder.authors, vec!["Slyder"]);
        assert_eq!(slyder.match_status, MatchStatus::Matched);
        assert_eq!(
            slyder.metadata.as_ref().and_then(|m| m.journal.as_deref()),
            Some("Ecology")
        );

        assert_eq!(result.missing_citations.len(), 1);
        assert_eq!(result.missing_citations[0].raw_text, "Hyland, 2015");
        assert_eq!(result.unused_references.len(), 1);
        assert_eq!(result.unused_references[0].id, "ref-1");
        assert_eq!(
            result.find("intext-num-2").unwrap().match_status,
            MatchStatus::Pending
        );
        assert_eq!(result.matched_count(), 1);
    }

    #[test]
    fn test_extractor_ordering() {
        let result = CitationExtractor::new().parse(DOC);
        let kinds: Vec<CitationKind> = result.citations.iter().map(|c| c.kind).collect();
        let first_ref = kinds.iter().position(|k| *k == CitationKind::Reference).unwrap();
        assert!(kinds[..first_ref].iter().all(|k| *k == CitationKind::InText));
        assert!(kinds[first_ref..].iter().all(|k| *k == CitationKind::Reference));
    }

    #[test]
    fn test_extractor_numeric_disabled() {
        let config = ParsingConfigBuilder::new()
            .numeric_citations(false)
            .build()
            .unwrap();
        let result = CitationExtractor::with_config(config).parse(DOC);
        assert_eq!(result.total_in_text, 2);
        assert!(result.in_text().all(|c| !c.is_numeric()));
    }

    #[test]
    fn test_extractor_skip_stats() {
        let doc = "Text (see above) here.\nReferences\nDoe, J. (2020). T.\nstray line\n";
        let result = CitationExtractor::new().parse(doc);
        assert_eq!(result.skip_stats.rejected_clauses, 1);
        assert_eq!(result.skip_stats.unmarked_lines, 1);
    }

    #[test]
    fn test_extractor_without_reference_section() {
        let ext = CitationExtractor::new();
        let sections = ext.split_sections("Body (Siler, 2012) only.");
        let mut stats = SkipStats::default();
        assert!(ext.extract_references(&sections, &mut stats).is_empty());
        assert_eq!(stats, SkipStats::default());

        let result = ext.parse("Body (Siler, 2012) only.");
        assert_eq!(result.total_in_text, 1);
        assert_eq!(result.missing_citations.len(), 1);
    }

    #[test]
    fn test_extractor_empty_document() {
        let result = CitationExtractor::new().parse("");
        assert!(result.is_empty());
        assert_eq!(result.total_in_text, 0);
        assert_eq!(result.total_references, 0);
        assert!(result.missing_citations.is_empty());
        assert!(result.unused_references.is_empty());
    }

    #[test]
    fn test_extractor_references_not_scanned_for_in_text() {
        // Parentheses in the reference list are not in-text citations
        let doc = "Body.\nReferences\nDoe, J. (2020). T (Roe, 2019).\n";
        let result = CitationExtractor::new().parse(doc);
        assert_eq!(result.total_in_text, 0);
        assert_eq!(result.total_references, 1);
    }
}
