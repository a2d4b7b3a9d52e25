use serde::{Deserialize, Serialize};

pub mod ids;
pub mod matching;

// Re-export for convenience
pub use ids::IdAllocator;
pub use matching::{MatchOutcome, authors_overlap, cross_reference, is_candidate};

/// Which stream a citation was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CitationKind {
    #[serde(rename = "in-text")]
    InText,
    #[serde(rename = "reference")]
    Reference,
}

/// Lifecycle tag recording whether a citation was cross-referenced.
///
/// In-text citations start as `Pending`, references as `Unused`. The matcher
/// moves a citation to `Matched` or `Missing` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Matched,
    Missing,
    Unused,
}

impl MatchStatus {
    /// Status a freshly extracted citation of `kind` starts with.
    pub fn initial(kind: CitationKind) -> Self {
        match kind {
            CitationKind::InText => Self::Pending,
            CitationKind::Reference => Self::Unused,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Missing => "missing",
            Self::Unused => "unused",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open byte range `[start, start + length)` into the parsed document.
///
/// Offsets always fall on `char` boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub length: usize,
}

impl Span {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// The text this span covers in `document`, or `None` if out of bounds.
    pub fn slice<'a>(&self, document: &'a str) -> Option<&'a str> {
        document.get(self.start..self.end())
    }
}

/// Bibliographic fields copied from a matched reference onto an in-text citation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub year: u32,
    pub journal: Option<String>,
    pub doi: Option<String>,
}

impl CitationMetadata {
    pub fn from_reference(reference: &Citation) -> Self {
        Self {
            title: reference.title.clone(),
            authors: reference.authors.clone(),
            year: reference.year,
            journal: reference.journal.clone(),
            doi: reference.doi.clone(),
        }
    }
}

/// One extracted in-text mention or reference-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Unique within one [`ParseResult`]; not stable across re-parses.
    pub id: String,
    pub kind: CitationKind,
    pub raw_text: String,
    pub authors: Vec<String>,
    /// Four-digit year, or `0` when unknown (numeric citations).
    pub year: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    pub match_status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CitationMetadata>,
    pub span: Span,
}

impl Citation {
    /// A pending in-text citation.
    pub fn in_text(
        id: String,
        raw_text: impl Into<String>,
        authors: Vec<String>,
        year: u32,
        span: Span,
    ) -> Self {
        Self {
            id,
            kind: CitationKind::InText,
            raw_text: raw_text.into(),
            authors,
            year,
            title: None,
            journal: None,
            doi: None,
            match_status: MatchStatus::initial(CitationKind::InText),
            metadata: None,
            span,
        }
    }

    /// An unused reference-list entry. Bibliographic fields are filled by the caller.
    pub fn reference(
        id: String,
        raw_text: impl Into<String>,
        authors: Vec<String>,
        year: u32,
        span: Span,
    ) -> Self {
        Self {
            id,
            kind: CitationKind::Reference,
            raw_text: raw_text.into(),
            authors,
            year,
            title: None,
            journal: None,
            doi: None,
            match_status: MatchStatus::initial(CitationKind::Reference),
            metadata: None,
            span,
        }
    }

    pub fn is_in_text(&self) -> bool {
        self.kind == CitationKind::InText
    }

    pub fn is_reference(&self) -> bool {
        self.kind == CitationKind::Reference
    }

    /// Bracketed numeric mention such as `[3]`; it carries no author tokens.
    pub fn is_numeric(&self) -> bool {
        self.is_in_text() && self.authors.is_empty()
    }
}

/// Counts of candidates the extractors looked at and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipStats {
    /// Parenthetical clauses that did not look like `Author, YYYY`.
    pub rejected_clauses: usize,
    /// Non-empty reference-region lines without a `(YYYY)` marker.
    pub unmarked_lines: usize,
}

/// Structured inventory of a document's citations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// In-text citations in extraction order, then references in list order.
    pub citations: Vec<Citation>,
    pub missing_citations: Vec<Citation>,
    pub unused_references: Vec<Citation>,
    pub total_in_text: usize,
    pub total_references: usize,
    #[serde(default)]
    pub skip_stats: SkipStats,
}

impl ParseResult {
    pub fn in_text(&self) -> impl Iterator<Item = &Citation> {
        self.citations.iter().filter(|c| c.is_in_text())
    }

    pub fn references(&self) -> impl Iterator<Item = &Citation> {
        self.citations.iter().filter(|c| c.is_reference())
    }

    /// Number of in-text citations resolved against the reference list.
    pub fn matched_count(&self) -> usize {
        self.in_text()
            .filter(|c| c.match_status == MatchStatus::Matched)
            .count()
    }

    pub fn find(&self, id: &str) -> Option<&Citation> {
        self.citations.iter().find(|c| c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }
}
