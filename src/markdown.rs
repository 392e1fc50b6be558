//! Annotated bibliography parser.
//!
//! Extracts article entries from Markdown written in the form:
//!
//! ```text
//! ### Article 1
//! **Smith, J. (2020). A study.**
//!
//! Annotation paragraph.
//!
//! **Full-text available at:** https://example.com/a.pdf
//! ```
//!
//! Fragments that lack a citation or a full-text URL are skipped, never reported
//! as errors. Use [`extract_articles_report`] to find out what was skipped.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Label that introduces the full-text URL of an article.
pub const FULL_TEXT_LABEL: &str = "**Full-text available at:**";

static ARTICLE_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"### Article (\d+)").expect("article delimiter regex"));

static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold span regex"));

static FULL_TEXT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://\S+").expect("full-text url regex"));

/// An article extracted from a bibliography section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleEntry {
    /// 1-based position among the extracted entries
    pub index: usize,
    /// The numeral written in the `### Article <n>` heading, if it parsed
    pub source_number: Option<u32>,
    /// Text of the first bold span of the fragment
    pub citation: String,
    /// Annotation text; paragraphs are separated by a blank line
    pub annotation: String,
    /// URL following the `**Full-text available at:**` label
    pub full_text_url: String,
}

impl ArticleEntry {
    /// Returns the non-empty annotation paragraphs in order.
    pub fn annotation_paragraphs(&self) -> impl Iterator<Item = &str> {
        self.annotation
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Why a fragment did not produce an [`ArticleEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingCitation,
    MissingUrl,
    MissingCitationAndUrl,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingCitation => write!(f, "no bold citation before the full-text line"),
            SkipReason::MissingUrl => write!(f, "no https:// full-text URL"),
            SkipReason::MissingCitationAndUrl => write!(f, "neither citation nor full-text URL"),
        }
    }
}

/// A fragment that was dropped during extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFragment {
    /// 1-based position of the fragment among all `### Article` fragments
    pub position: usize,
    pub source_number: Option<u32>,
    pub reason: SkipReason,
}

/// Result of a full extraction pass: kept entries plus dropped fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractReport {
    pub articles: Vec<ArticleEntry>,
    pub skipped: Vec<SkippedFragment>,
}

/// Returns the text between `start_marker` and `end_marker`.
///
/// The section starts right after the first occurrence of `start_marker` and
/// runs up to the next occurrence of `end_marker`, or to the end of the
/// document when there is no end marker (or it does not occur).
///
/// Returns `None` when `start_marker` is not found.
///
/// # Examples
///
/// ```
/// use bib_blocks::extract_section;
///
/// let doc = "## Bibliography 1: A\nfirst\n## Bibliography 2: B\nsecond";
/// let section = extract_section(doc, "## Bibliography 1:", Some("## Bibliography 2:"));
/// assert_eq!(section, Some(" A\nfirst\n"));
/// ```
pub fn extract_section<'a>(
    markdown: &'a str,
    start_marker: &str,
    end_marker: Option<&str>,
) -> Option<&'a str> {
    let start = markdown.find(start_marker)? + start_marker.len();
    let rest = &markdown[start..];
    let end = end_marker
        .and_then(|marker| rest.find(marker))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Extracts all well-formed articles from a bibliography section.
///
/// Entries are renumbered 1..N in document order; the numeral in the
/// `### Article <n>` heading is kept as [`ArticleEntry::source_number`] only.
///
/// # Examples
///
/// ```
/// use bib_blocks::extract_articles;
///
/// let md = "### Article 7\n**Doe (2021). Title.**\n\n**Full-text available at:** https://x.org/a\n";
/// let articles = extract_articles(md);
/// assert_eq!(articles.len(), 1);
/// assert_eq!(articles[0].index, 1);
/// assert_eq!(articles[0].source_number, Some(7));
/// ```
pub fn extract_articles(markdown: &str) -> Vec<ArticleEntry> {
    extract_articles_report(markdown).articles
}

/// Extracts articles and reports every fragment that was skipped.
pub fn extract_articles_report(markdown: &str) -> ExtractReport {
    // (start, end, numeral) of each delimiter
    let delimiters: Vec<(usize, usize, Option<u32>)> = ARTICLE_DELIMITER
        .captures_iter(markdown)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let number = cap.get(1).and_then(|n| n.as_str().parse().ok());
            Some((whole.start(), whole.end(), number))
        })
        .collect();

    let mut report = ExtractReport::default();

    for (i, &(_, fragment_start, source_number)) in delimiters.iter().enumerate() {
        let fragment_end = delimiters
            .get(i + 1)
            .map_or(markdown.len(), |&(next_start, _, _)| next_start);
        let scan = scan_fragment(&markdown[fragment_start..fragment_end]);

        let reason = match (scan.citation, scan.url) {
            (Some(citation), Some(full_text_url)) => {
                report.articles.push(ArticleEntry {
                    index: report.articles.len() + 1,
                    source_number,
                    citation,
                    annotation: scan.annotation,
                    full_text_url,
                });
                continue;
            }
            (None, Some(_)) => SkipReason::MissingCitation,
            (Some(_), None) => SkipReason::MissingUrl,
            (None, None) => SkipReason::MissingCitationAndUrl,
        };

        log::debug!(
            "skipping article fragment {} (### Article {}): {}",
            i + 1,
            source_number.map_or_else(|| "?".to_string(), |n| n.to_string()),
            reason
        );
        report.skipped.push(SkippedFragment {
            position: i + 1,
            source_number,
            reason,
        });
    }

    log::debug!(
        "extracted {} article(s), skipped {} fragment(s)",
        report.articles.len(),
        report.skipped.len()
    );

    report
}

/// Where the line scanner is within a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekCitation,
    SeekAnnotation,
    /// Label seen at the end of a line; the URL is on the next non-blank line.
    SeekUrl,
    Done,
}

#[derive(Debug, Default)]
struct FragmentScan {
    citation: Option<String>,
    annotation: String,
    url: Option<String>,
}

fn scan_fragment(fragment: &str) -> FragmentScan {
    let mut scan = FragmentScan::default();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut state = ScanState::SeekCitation;

    for line in fragment.lines() {
        let trimmed = line.trim();

        state = match state {
            ScanState::SeekCitation => {
                if let Some((before, rest)) = split_at_label(trimmed) {
                    // A citation may share the line with the label
                    scan.citation = first_bold_span(before);
                    take_url(rest, &mut scan.url)
                } else if let Some(citation) = first_bold_span(trimmed) {
                    scan.citation = Some(citation);
                    ScanState::SeekAnnotation
                } else {
                    ScanState::SeekCitation
                }
            }
            ScanState::SeekAnnotation => {
                if let Some((before, rest)) = split_at_label(trimmed) {
                    let before = before.trim();
                    if !before.is_empty() {
                        current.push(before);
                    }
                    take_url(rest, &mut scan.url)
                } else if trimmed.is_empty() {
                    flush_paragraph(&mut current, &mut paragraphs);
                    ScanState::SeekAnnotation
                } else {
                    current.push(trimmed);
                    ScanState::SeekAnnotation
                }
            }
            ScanState::SeekUrl if trimmed.is_empty() => ScanState::SeekUrl,
            ScanState::SeekUrl => {
                scan.url = leading_url(trimmed);
                ScanState::Done
            }
            ScanState::Done => break,
        };
    }

    flush_paragraph(&mut current, &mut paragraphs);
    scan.annotation = paragraphs.join("\n\n");
    scan
}

fn flush_paragraph(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
        current.clear();
    }
}

/// Splits a line carrying the full-text label into the text before and after it.
fn split_at_label(line: &str) -> Option<(&str, &str)> {
    line.find(FULL_TEXT_LABEL)
        .map(|pos| (&line[..pos], &line[pos + FULL_TEXT_LABEL.len()..]))
}

fn take_url(rest: &str, url: &mut Option<String>) -> ScanState {
    let rest = rest.trim();
    if rest.is_empty() {
        return ScanState::SeekUrl;
    }
    *url = leading_url(rest);
    ScanState::Done
}

fn leading_url(text: &str) -> Option<String> {
    FULL_TEXT_URL.find(text).map(|m| m.as_str().to_string())
}

fn first_bold_span(line: &str) -> Option<String> {
    BOLD_SPAN
        .captures(line)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
