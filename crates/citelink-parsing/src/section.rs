use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// A document split into its body and reference region.
///
/// Both parts borrow from the original text. `references_start` is the byte
/// offset of the reference region within that text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<'a> {
    pub body: &'a str,
    pub references: &'a str,
    pub references_start: usize,
}

impl Sections<'_> {
    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }
}

/// Split the document at the first reference-list heading.
///
/// The heading is a line holding only `References`, `Bibliography` or
/// `Works Cited` (any case) followed by a line break. Everything before the
/// heading is body; everything after the heading line is the reference region.
/// Without a heading the whole text is body.
pub fn split_sections(text: &str) -> Sections<'_> {
    split_sections_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`split_sections`].
pub(crate) fn split_sections_with_config<'a>(
    text: &'a str,
    config: &ParsingConfig,
) -> Sections<'a> {
    static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?im)^[ \t]*(?:References|Bibliography|Works Cited)\s*\n").unwrap()
    });

    let header_re = config.section_header_re.as_ref().unwrap_or(&HEADER_RE);

    match header_re.find(text) {
        Some(m) => Sections {
            body: &text[..m.start()],
            references: &text[m.end()..],
            references_start: m.end(),
        },
        None => Sections {
            body: text,
            references: "",
            references_start: text.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;

    #[test]
    fn test_split_at_heading() {
        let text = "Body (Siler, 2012).\n\nReferences\nSiler, K. (2012). Title.\n";
        let s = split_sections(text);
        assert_eq!(s.body, "Body (Siler, 2012).\n\n");
        assert_eq!(s.references, "Siler, K. (2012). Title.\n");
        assert_eq!(&text[s.references_start..], s.references);
    }

    #[test]
    fn test_heading_case_insensitive() {
        for heading in ["REFERENCES", "bibliography", "Works cited"] {
            let text = format!("Body.\n{}\nDoe, J. (2020). T.\n", heading);
            let s = split_sections(&text);
            assert_eq!(s.body, "Body.\n", "heading {heading}");
            assert!(s.references.starts_with("Doe"));
        }
    }

    #[test]
    fn test_no_heading_means_all_body() {
        let text = "Just prose (Siler, 2012) with no list.";
        let s = split_sections(text);
        assert_eq!(s.body, text);
        assert!(!s.has_references());
        assert_eq!(s.references_start, text.len());
    }

    #[test]
    fn test_heading_needs_line_break() {
        let text = "Body.\nReferences";
        let s = split_sections(text);
        assert_eq!(s.body, text);
        assert!(!s.has_references());
    }

    #[test]
    fn test_heading_must_be_bare_line() {
        let text = "See the References\nBody continues.\n";
        let s = split_sections(text);
        assert_eq!(s.body, text);
    }

    #[test]
    fn test_first_heading_wins() {
        let text = "Body.\nReferences\nA, B. (2001). X.\nBibliography\nC, D. (2002). Y.\n";
        let s = split_sections(text);
        assert_eq!(s.body, "Body.\n");
        assert!(s.references.contains("Bibliography"));
    }

    #[test]
    fn test_heading_at_document_start() {
        let text = "References\nDoe, J. (2020). T.\n";
        let s = split_sections(text);
        assert_eq!(s.body, "");
        assert_eq!(s.references_start, "References\n".len());
    }

    #[test]
    fn test_trailing_whitespace_and_crlf() {
        let text = "Body.\r\nReferences  \r\nDoe, J. (2020). T.\r\n";
        let s = split_sections(text);
        assert_eq!(s.body, "Body.\r\n");
        assert!(s.references.starts_with("Doe"));
    }

    #[test]
    fn test_custom_section_header_regex() {
        let config = ParsingConfigBuilder::new()
            .section_header_regex(r"(?im)^Literaturverzeichnis\s*\n")
            .build()
            .unwrap();
        let text = "Text.\nLiteraturverzeichnis\nDoe, J. (2020). T.\n";
        let s = split_sections_with_config(text, &config);
        assert_eq!(s.body, "Text.\n");
        assert_eq!(s.references, "Doe, J. (2020). T.\n");

        // Default heading no longer recognized
        let s2 = split_sections_with_config("Text.\nReferences\nX\n", &config);
        assert!(!s2.has_references());
    }
}
