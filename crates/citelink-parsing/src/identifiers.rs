use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

static DOI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)10\.[0-9]{4,9}/\S+").unwrap());

/// Strip punctuation that closes the sentence rather than the DOI.
fn clean_doi(doi: &str) -> &str {
    doi.trim_end_matches(['.', ',', ';'])
}

/// Extract the first DOI found anywhere in a reference line.
///
/// Handles bare DOIs as well as DOIs inside `https://doi.org/...` URLs and
/// `doi:` prefixes, since the match is not anchored.
pub fn extract_doi(text: &str) -> Option<String> {
    extract_doi_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_doi`].
pub(crate) fn extract_doi_with_config(text: &str, config: &ParsingConfig) -> Option<String> {
    let doi_re = config.doi_re.as_ref().unwrap_or(&DOI_RE);
    doi_re
        .find(text)
        .map(|m| clean_doi(m.as_str()))
        .filter(|doi| !doi.is_empty())
        .map(str::to_string)
}

/// Whether `text` opens with something that identifies a work rather than naming it
/// (a DOI, URL or `doi:` prefix).
pub fn starts_with_identifier(text: &str) -> bool {
    let lower = text.trim_start().to_lowercase();
    lower.starts_with("10.")
        || lower.starts_with("http")
        || lower.starts_with("www.")
        || lower.starts_with("doi")
        || lower.starts_with("arxiv")
}
