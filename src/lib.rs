//! bib-blocks: compile annotated Markdown bibliographies into Notion block trees.
//!
//! This library provides functionality to:
//! - Extract `### Article <n>` entries (citation, annotation, full-text URL) from Markdown
//! - Compile entries into ordered presentation blocks
//! - Load the Notion workspace configuration
//! - Render blocks as Notion API JSON or as a Markdown preview

pub mod blocks;
pub mod config;
pub mod markdown;
pub mod output;

pub use blocks::{compile_bibliography_page, compile_blocks, BlockNode, TextSpan};
pub use config::{database_url, load_config, ConfigError, NotionConfig};
pub use markdown::{
    extract_articles, extract_articles_report, extract_section, ArticleEntry, ExtractReport,
    SkipReason, SkippedFragment,
};
pub use output::{render_append_request, render_markdown, render_notion_block};
