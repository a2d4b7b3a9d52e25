use thiserror::Error;

pub mod config;
pub mod extractor;
pub mod identifiers;
pub mod in_text;
pub mod references;
pub mod section;

pub use config::{ParsingConfig, ParsingConfigBuilder};
pub use extractor::CitationExtractor;
pub use section::Sections;
// Re-export domain types from core (canonical definitions live there)
pub use citelink_core::{
    Citation, CitationKind, CitationMetadata, MatchStatus, ParseResult, SkipStats, Span,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {field} pattern: {source}")]
    InvalidPattern {
        field: &'static str,
        source: regex::Error,
    },
}

/// Parse a document into its citation inventory using the default configuration.
///
/// Pipeline:
/// 1. Split the text at the first References/Bibliography/Works Cited heading
/// 2. Extract parenthetical author-year and bracketed numeric mentions from the body
/// 3. Extract `(YYYY)`-marked entries from the reference region
/// 4. Cross-reference mentions against entries
/// 5. Collect missing citations and unused references
pub fn parse_citations(text: &str) -> ParseResult {
    CitationExtractor::new().parse(text)
}
