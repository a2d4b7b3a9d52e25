use std::io::Write;

use citelink_core::{Citation, MatchStatus, ParseResult};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// 1-based line and column of a byte offset in `text`.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let col = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, col)
}

fn shorten(s: &str, max: usize) -> String {
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() > max {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        s
    }
}

/// Print the counts line after parsing.
pub fn print_scan_summary(
    w: &mut dyn Write,
    file_name: &str,
    result: &ParseResult,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Scanning {}...", file_name)?;
    if result.is_empty() {
        writeln!(w, "No citations or reference entries found")?;
        writeln!(w)?;
        return Ok(());
    }
    writeln!(
        w,
        "Found {} in-text citations and {} reference entries",
        result.total_in_text, result.total_references
    )?;

    let skipped = result.skip_stats.rejected_clauses + result.skip_stats.unmarked_lines;
    if skipped > 0 {
        let msg = format!(
            "(Skipped {} parenthetical asides, {} unmarked reference lines)",
            result.skip_stats.rejected_clauses, result.skip_stats.unmarked_lines
        );
        if color.enabled() {
            writeln!(w, "{}", msg.dimmed())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

fn print_citation_line(
    w: &mut dyn Write,
    text: &str,
    citation: &Citation,
    color: ColorMode,
) -> std::io::Result<()> {
    let (line, col) = line_col(text, citation.span.start);
    let location = format!("{}:{}", line, col);
    let raw = shorten(&citation.raw_text, 90);
    if color.enabled() {
        writeln!(w, "  {} {}", location.dimmed(), raw)
    } else {
        writeln!(w, "  {} {}", location, raw)
    }
}

/// Print missing citations and unused references with their locations.
pub fn print_problems(
    w: &mut dyn Write,
    text: &str,
    result: &ParseResult,
    color: ColorMode,
) -> std::io::Result<()> {
    if !result.missing_citations.is_empty() {
        let header = format!(
            "MISSING FROM REFERENCE LIST ({})",
            result.missing_citations.len()
        );
        if color.enabled() {
            writeln!(w, "{}", header.bold().red())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        for c in &result.missing_citations {
            print_citation_line(w, text, c, color)?;
        }
        writeln!(w)?;
    }

    if !result.unused_references.is_empty() {
        let header = format!("NEVER CITED ({})", result.unused_references.len());
        if color.enabled() {
            writeln!(w, "{}", header.bold().yellow())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        for c in &result.unused_references {
            print_citation_line(w, text, c, color)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Print the final tally.
pub fn print_summary(
    w: &mut dyn Write,
    result: &ParseResult,
    color: ColorMode,
) -> std::io::Result<()> {
    let unresolved = result
        .in_text()
        .filter(|c| c.match_status == MatchStatus::Pending)
        .count();
    let matched = result.matched_count();
    let missing = result.missing_citations.len();
    let unused = result.unused_references.len();

    let sep = "=".repeat(60);
    writeln!(w, "{}", sep)?;
    writeln!(w, "SUMMARY")?;
    writeln!(w, "{}", sep)?;
    if color.enabled() {
        writeln!(w, "  Matched:            {}", matched.green())?;
        writeln!(w, "  Missing:            {}", missing.red())?;
        writeln!(w, "  Unused references:  {}", unused.yellow())?;
    } else {
        writeln!(w, "  Matched:            {}", matched)?;
        writeln!(w, "  Missing:            {}", missing)?;
        writeln!(w, "  Unused references:  {}", unused)?;
    }
    if unresolved > 0 {
        writeln!(
            w,
            "  Unresolved numeric: {} (numeric citations are not cross-referenced)",
            unresolved
        )?;
    }
    Ok(())
}
