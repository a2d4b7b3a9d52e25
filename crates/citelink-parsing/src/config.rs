use regex::Regex;

use crate::ConfigError;

/// Configuration for the citation extraction pipeline.
///
/// Regex fields are `Option<Regex>`: `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── section.rs ──
    /// Regex locating the heading that opens the reference list.
    pub(crate) section_header_re: Option<Regex>,

    // ── identifiers.rs ──
    /// Regex matching a DOI anywhere in a reference line.
    pub(crate) doi_re: Option<Regex>,

    // ── in_text.rs ──
    /// Whether to run the bracketed numeric pass (`[1]`, `[2, 3]`).
    pub(crate) numeric_citations: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            section_header_re: None,
            doi_re: None,
            numeric_citations: true,
        }
    }
}

impl ParsingConfig {
    pub fn numeric_citations(&self) -> bool {
        self.numeric_citations
    }

    /// Whether any pattern differs from the built-in defaults.
    pub fn has_custom_patterns(&self) -> bool {
        self.section_header_re.is_some() || self.doi_re.is_some()
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with [`ConfigError::InvalidPattern`] if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    section_header_re: Option<String>,
    doi_re: Option<String>,
    numeric_citations: Option<bool>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the reference-list heading pattern.
    ///
    /// The body ends where the first match starts and the reference region
    /// begins where it ends, so the pattern should consume the heading's line break.
    pub fn section_header_regex(mut self, pattern: &str) -> Self {
        self.section_header_re = Some(pattern.to_string());
        self
    }

    pub fn doi_regex(mut self, pattern: &str) -> Self {
        self.doi_re = Some(pattern.to_string());
        self
    }

    pub fn numeric_citations(mut self, enabled: bool) -> Self {
        self.numeric_citations = Some(enabled);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, ConfigError> {
        let compile = |field: &'static str,
                       opt: Option<String>|
         -> Result<Option<Regex>, ConfigError> {
            opt.map(|p| Regex::new(&p))
                .transpose()
                .map_err(|source| ConfigError::InvalidPattern { field, source })
        };

        Ok(ParsingConfig {
            section_header_re: compile("section header", self.section_header_re)?,
            doi_re: compile("DOI", self.doi_re)?,
            numeric_citations: self.numeric_citations.unwrap_or(true),
        })
    }
}
