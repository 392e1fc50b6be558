//! Block tree compilation.
//!
//! Turns extracted [`ArticleEntry`] values into an ordered sequence of
//! [`BlockNode`]s. Block order is page order: callers append the sequence
//! as-is.

use serde::Serialize;

use crate::markdown::ArticleEntry;

pub const QUICK_ACCESS_HEADING: &str = "Quick Access: Citations & Full-Text Links";
pub const QUICK_ACCESS_INTRO: &str =
    "All citations and direct links to full-text versions are listed below for easy access:";
pub const CATALOG_HEADING: &str = "View All Articles in Database";
pub const CATALOG_INTRO: &str = "For detailed article information including summaries, strengths, weaknesses, and additional metadata, visit the Articles database:";
pub const CITATION_ICON: &str = "📄";

/// A run of text with optional styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSpan {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            href: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    /// Bold hyperlinked text.
    pub fn bold_link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::bold(text)
        }
    }
}

/// One presentation block.
///
/// Serialises with a `kind` tag, e.g. `{"kind":"divider"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockNode {
    /// Heading of level 1 to 3
    Heading { level: u8, text: Vec<TextSpan> },
    Paragraph { text: Vec<TextSpan> },
    /// Highlighted text with an optional emoji icon
    Callout {
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        text: Vec<TextSpan>,
    },
    Divider,
}

impl BlockNode {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        BlockNode::Heading {
            level: level.clamp(1, 3),
            text: vec![TextSpan::plain(text)],
        }
    }

    pub fn paragraph(spans: Vec<TextSpan>) -> Self {
        BlockNode::Paragraph { text: spans }
    }

    pub fn callout(icon: Option<&str>, text: impl Into<String>) -> Self {
        BlockNode::Callout {
            icon: icon.map(str::to_string),
            text: vec![TextSpan::plain(text)],
        }
    }

    /// Name of the variant, as used in the serialised `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockNode::Heading { .. } => "heading",
            BlockNode::Paragraph { .. } => "paragraph",
            BlockNode::Callout { .. } => "callout",
            BlockNode::Divider => "divider",
        }
    }

    /// The spans of the block; empty for dividers.
    pub fn spans(&self) -> &[TextSpan] {
        match self {
            BlockNode::Heading { text, .. }
            | BlockNode::Paragraph { text }
            | BlockNode::Callout { text, .. } => text,
            BlockNode::Divider => &[],
        }
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.spans().iter().map(|s| s.text.as_str()).collect()
    }
}

/// Compiles the quick-access section for a bibliography page.
///
/// The output always holds `4 + 4 * entries.len()` blocks: a heading and an
/// explanatory paragraph, then per entry a subheading, a callout with the
/// citation, a link paragraph and a divider, then a closing subheading and a
/// paragraph linking to `cross_reference_locator`.
///
/// The locator is rendered as given; it is not validated.
///
/// # Examples
///
/// ```
/// use bib_blocks::compile_blocks;
///
/// let blocks = compile_blocks(&[], "https://www.notion.so/abc");
/// assert_eq!(blocks.len(), 4);
/// ```
pub fn compile_blocks(entries: &[ArticleEntry], cross_reference_locator: &str) -> Vec<BlockNode> {
    let mut blocks = Vec::with_capacity(4 + 4 * entries.len());

    blocks.push(BlockNode::heading(2, QUICK_ACCESS_HEADING));
    blocks.push(BlockNode::paragraph(vec![TextSpan::plain(QUICK_ACCESS_INTRO)]));

    for entry in entries {
        blocks.push(BlockNode::heading(3, format!("Article {}", entry.index)));
        blocks.push(BlockNode::callout(Some(CITATION_ICON), entry.citation.as_str()));
        blocks.push(BlockNode::paragraph(vec![
            TextSpan::plain("🔗 "),
            TextSpan::bold_link("Full-text available here", entry.full_text_url.as_str()),
            TextSpan::plain(format!(" ({})", entry.full_text_url)),
        ]));
        blocks.push(BlockNode::Divider);
    }

    blocks.push(BlockNode::heading(3, CATALOG_HEADING));
    blocks.push(BlockNode::paragraph(vec![
        TextSpan::plain(format!("{} ", CATALOG_INTRO)),
        TextSpan::bold_link(cross_reference_locator, cross_reference_locator),
    ]));

    blocks
}

/// Compiles a complete annotated bibliography page.
///
/// Emits the title and introduction, then for each entry its heading, bold
/// citation, one paragraph per annotation paragraph, the full-text link and a
/// divider. An empty `introduction` is left out.
pub fn compile_bibliography_page(
    title: &str,
    introduction: &str,
    entries: &[ArticleEntry],
) -> Vec<BlockNode> {
    let mut blocks = vec![BlockNode::heading(1, title)];
    if !introduction.trim().is_empty() {
        blocks.push(BlockNode::paragraph(vec![TextSpan::plain(introduction.trim())]));
    }
    blocks.push(BlockNode::Divider);

    for entry in entries {
        blocks.push(BlockNode::heading(3, format!("Article {}", entry.index)));
        blocks.push(BlockNode::paragraph(vec![TextSpan::bold(entry.citation.as_str())]));
        blocks.extend(
            entry
                .annotation_paragraphs()
                .map(|p| BlockNode::paragraph(vec![TextSpan::plain(p)])),
        );
        blocks.push(BlockNode::paragraph(vec![
            TextSpan::plain("Full-text available at: "),
            TextSpan::bold_link(entry.full_text_url.as_str(), entry.full_text_url.as_str()),
        ]));
        blocks.push(BlockNode::Divider);
    }

    blocks
}
