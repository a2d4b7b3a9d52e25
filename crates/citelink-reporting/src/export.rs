use std::path::Path;
use std::str::FromStr;

use citelink_core::{Citation, MatchStatus, ParseResult};

use crate::ReportError;

/// Output format for an exported report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[Self::Json, Self::Csv, Self::Markdown, Self::Text]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Markdown => "Markdown",
            Self::Text => "Plain Text",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "md",
            Self::Text => "txt",
        }
    }

    /// Guess the format from an output path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if ext == "markdown" {
            return Some(Self::Markdown);
        }
        Self::all().iter().copied().find(|f| f.extension() == ext)
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "md" | "markdown" => Ok(Self::Markdown),
            "txt" | "text" => Ok(Self::Text),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Render a report for one parsed document.
pub fn render_report(
    result: &ParseResult,
    document_name: &str,
    format: ExportFormat,
) -> Result<String, ReportError> {
    Ok(match format {
        ExportFormat::Json => serde_json::to_string_pretty(result)?,
        ExportFormat::Csv => export_csv(result),
        ExportFormat::Markdown => export_markdown(result, document_name),
        ExportFormat::Text => export_text(result, document_name),
    })
}

/// Render a report and write it to `path`.
pub fn export_report(
    result: &ParseResult,
    document_name: &str,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ReportError> {
    let content = render_report(result, document_name, format)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Counts shown in report headers.
struct Summary {
    in_text: usize,
    references: usize,
    matched: usize,
    missing: usize,
    unused: usize,
    unresolved: usize,
}

impl Summary {
    fn of(result: &ParseResult) -> Self {
        Self {
            in_text: result.total_in_text,
            references: result.total_references,
            matched: result.matched_count(),
            missing: result.missing_citations.len(),
            unused: result.unused_references.len(),
            unresolved: result
                .in_text()
                .filter(|c| c.match_status == MatchStatus::Pending)
                .count(),
        }
    }
}

fn kind_str(c: &Citation) -> &'static str {
    if c.is_in_text() { "in-text" } else { "reference" }
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn export_csv(result: &ParseResult) -> String {
    let mut out =
        String::from("Id,Kind,Status,Start,Length,Year,Authors,Title,Journal,DOI,RawText\n");
    for c in &result.citations {
        // Matched in-text citations report the linked reference's fields
        let (title, journal, doi) = match &c.metadata {
            Some(m) => (&m.title, &m.journal, &m.doi),
            None => (&c.title, &c.journal, &c.doi),
        };
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            csv_escape(&c.id),
            kind_str(c),
            c.match_status,
            c.span.start,
            c.span.length,
            c.year,
            csv_escape(&c.authors.join("; ")),
            csv_escape(title.as_deref().unwrap_or("")),
            csv_escape(journal.as_deref().unwrap_or("")),
            csv_escape(doi.as_deref().unwrap_or("")),
            csv_escape(&c.raw_text),
        ));
    }
    out
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('*', "\\*").replace('_', "\\_")
}

fn export_markdown(result: &ParseResult, document_name: &str) -> String {
    let s = Summary::of(result);
    let mut out = format!("# Citation Report: {}\n\n", md_escape(document_name));

    out.push_str(&format!(
        "**{}** in-text | **{}** references | **{}** matched | **{}** missing | **{}** unused | **{}** unresolved numeric\n\n",
        s.in_text, s.references, s.matched, s.missing, s.unused, s.unresolved,
    ));

    if !result.missing_citations.is_empty() {
        out.push_str("### Missing Citations\n\n");
        for c in &result.missing_citations {
            out.push_str(&format!(
                "- `{}` at offset {}\n",
                one_line(&c.raw_text),
                c.span.start
            ));
        }
        out.push('\n');
    }

    if !result.unused_references.is_empty() {
        out.push_str("### Unused References\n\n");
        for c in &result.unused_references {
            out.push_str(&format!("- {}\n", md_escape(&one_line(&c.raw_text))));
        }
        out.push('\n');
    }

    let matched: Vec<&Citation> = result
        .in_text()
        .filter(|c| c.match_status == MatchStatus::Matched)
        .collect();
    if !matched.is_empty() {
        out.push_str("### Matched Citations\n\n");
        for c in matched {
            let title = c
                .metadata
                .as_ref()
                .and_then(|m| m.title.as_deref())
                .unwrap_or("(untitled)");
            out.push_str(&format!(
                "- `{}` \u{2192} {}",
                one_line(&c.raw_text),
                md_escape(title)
            ));
            if let Some(doi) = c.metadata.as_ref().and_then(|m| m.doi.as_deref()) {
                out.push_str(&format!(" ([{doi}](https://doi.org/{doi}))"));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

fn export_text(result: &ParseResult, document_name: &str) -> String {
    let s = Summary::of(result);
    let sep = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("{sep}\n"));
    out.push_str(&format!("CITATION REPORT: {}\n", document_name));
    out.push_str(&format!("{sep}\n"));
    out.push_str(&format!("In-text citations:   {}\n", s.in_text));
    out.push_str(&format!("Reference entries:   {}\n", s.references));
    out.push_str(&format!("Matched:             {}\n", s.matched));
    out.push_str(&format!("Missing:             {}\n", s.missing));
    out.push_str(&format!("Unused references:   {}\n", s.unused));
    out.push_str(&format!("Unresolved numeric:  {}\n", s.unresolved));

    if !result.missing_citations.is_empty() {
        out.push_str("\nMISSING FROM REFERENCE LIST\n");
        for c in &result.missing_citations {
            out.push_str(&format!("  [{}] {}\n", c.span.start, one_line(&c.raw_text)));
        }
    }

    if !result.unused_references.is_empty() {
        out.push_str("\nNEVER CITED\n");
        for c in &result.unused_references {
            out.push_str(&format!("  {}\n", one_line(&c.raw_text)));
        }
    }

    out
}
