//! Output generation for compiled block trees.
//!
//! Renders [`BlockNode`] sequences either as Notion API block objects or as a
//! Markdown preview for reviewing a page before it is appended.

use serde_json::{json, Map, Value};

use crate::blocks::{BlockNode, TextSpan};

/// Renders one block as a Notion block object.
pub fn render_notion_block(block: &BlockNode) -> Value {
    let (block_type, body) = match block {
        BlockNode::Heading { level, text } => (
            format!("heading_{}", (*level).clamp(1, 3)),
            json!({ "rich_text": rich_text(text) }),
        ),
        BlockNode::Paragraph { text } => {
            ("paragraph".to_string(), json!({ "rich_text": rich_text(text) }))
        }
        BlockNode::Callout { icon, text } => {
            let mut body = json!({ "rich_text": rich_text(text) });
            if let Some(emoji) = icon {
                body["icon"] = json!({ "type": "emoji", "emoji": emoji });
            }
            ("callout".to_string(), body)
        }
        BlockNode::Divider => ("divider".to_string(), json!({})),
    };

    let mut object = Map::new();
    object.insert("object".to_string(), json!("block"));
    object.insert("type".to_string(), json!(block_type));
    object.insert(block_type, body);
    Value::Object(object)
}

/// Renders a block sequence as the body of an "append block children" request.
pub fn render_append_request(blocks: &[BlockNode]) -> Value {
    let children: Vec<Value> = blocks.iter().map(render_notion_block).collect();
    json!({ "children": children })
}

fn rich_text(spans: &[TextSpan]) -> Vec<Value> {
    spans
        .iter()
        .map(|span| {
            let mut text = json!({ "content": span.text });
            if let Some(href) = &span.href {
                text["link"] = json!({ "url": href });
            }
            let mut item = json!({ "type": "text", "text": text });
            if span.bold {
                item["annotations"] = json!({ "bold": true });
            }
            item
        })
        .collect()
}

/// Renders a block sequence as Markdown.
///
/// Blocks are separated by a blank line; the result ends with a newline
/// unless it is empty.
pub fn render_markdown(blocks: &[BlockNode]) -> String {
    let rendered: Vec<String> = blocks
        .iter()
        .map(|block| match block {
            BlockNode::Heading { level, text } => {
                format!("{} {}", "#".repeat((*level).clamp(1, 3) as usize), inline(text))
            }
            BlockNode::Paragraph { text } => inline(text),
            BlockNode::Callout { icon, text } => match icon {
                Some(emoji) => format!("> {} {}", emoji, inline(text)),
                None => format!("> {}", inline(text)),
            },
            BlockNode::Divider => "---".to_string(),
        })
        .collect();

    let mut output = rendered.join("\n\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

fn inline(spans: &[TextSpan]) -> String {
    spans
        .iter()
        .map(|span| {
            let text = match &span.href {
                Some(href) => format!("[{}]({})", span.text, href),
                None => span.text.clone(),
            };
            if span.bold && !text.trim().is_empty() {
                format!("**{}**", text)
            } else {
                text
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::compile_blocks;
    use crate::markdown::ArticleEntry;

    fn smith() -> ArticleEntry {
        ArticleEntry {
            index: 1,
            source_number: Some(1),
            citation: "Smith, J. (2020). A study.".to_string(),
            annotation: String::new(),
            full_text_url: "https://example.com/a.pdf".to_string(),
        }
    }

    // ===========================================
    // Tests for render_notion_block
    // ===========================================

    #[test]
    fn test_render_heading() {
        let value = render_notion_block(&BlockNode::heading(3, "Article 1"));
        assert_eq!(
            value,
            json!({
                "object": "block",
                "type": "heading_3",
                "heading_3": {
                    "rich_text": [{"type": "text", "text": {"content": "Article 1"}}]
                }
            })
        );
    }

    #[test]
    fn test_render_heading_level_out_of_range() {
        // Given: A heading built directly with a level the API does not have
        let block = BlockNode::Heading {
            level: 5,
            text: vec![TextSpan::plain("Deep")],
        };

        // Then: Both renderers fall back to the deepest supported level
        assert_eq!(render_notion_block(&block)["type"], "heading_3");
        assert_eq!(render_markdown(&[block]), "### Deep\n");
    }

    #[test]
    fn test_render_callout_with_icon() {
        let value = render_notion_block(&BlockNode::callout(Some("📄"), "Citation"));
        assert_eq!(value["type"], "callout");
        assert_eq!(value["callout"]["icon"]["emoji"], "📄");
        assert_eq!(value["callout"]["rich_text"][0]["text"]["content"], "Citation");
    }

    #[test]
    fn test_render_bold_link_span() {
        // Given: A paragraph with a bold hyperlink
        let block = BlockNode::paragraph(vec![TextSpan::bold_link("here", "https://a.org")]);

        // When: We render it
        let value = render_notion_block(&block);

        // Then: The link and bold annotation are both present
        let span = &value["paragraph"]["rich_text"][0];
        assert_eq!(span["text"]["link"]["url"], "https://a.org");
        assert_eq!(span["annotations"]["bold"], true);
    }

    #[test]
    fn test_render_plain_span_has_no_annotations() {
        let value = render_notion_block(&BlockNode::paragraph(vec![TextSpan::plain("x")]));
        let span = &value["paragraph"]["rich_text"][0];
        assert!(span.get("annotations").is_none());
        assert!(span["text"].get("link").is_none());
    }

    #[test]
    fn test_render_divider() {
        assert_eq!(
            render_notion_block(&BlockNode::Divider),
            json!({"object": "block", "type": "divider", "divider": {}})
        );
    }

    #[test]
    fn test_render_append_request_preserves_order() {
        // Given: A compiled quick-access section
        let blocks = compile_blocks(&[smith()], "https://www.notion.so/abc");

        // When: We render the request body
        let request = render_append_request(&blocks);

        // Then: Children follow block order
        let children = request["children"].as_array().unwrap();
        assert_eq!(children.len(), 8);
        assert_eq!(children[0]["type"], "heading_2");
        assert_eq!(children[3]["type"], "callout");
        assert_eq!(children[5]["type"], "divider");
        assert_eq!(children[7]["type"], "paragraph");
    }

    // ===========================================
    // Tests for render_markdown
    // ===========================================

    #[test]
    fn test_render_markdown_empty() {
        assert_eq!(render_markdown(&[]), "");
    }

    #[test]
    fn test_render_markdown_article() {
        // Given: The blocks of one article
        let blocks = compile_blocks(&[smith()], "https://x");

        // When: We render Markdown
        let md = render_markdown(&blocks);

        // Then: Each block kind has its Markdown form
        assert!(md.starts_with("## Quick Access: Citations & Full-Text Links\n\n"));
        assert!(md.contains("### Article 1\n\n> 📄 Smith, J. (2020). A study.\n\n"));
        assert!(md.contains(
            "🔗 **[Full-text available here](https://example.com/a.pdf)** (https://example.com/a.pdf)"
        ));
        assert!(md.contains("\n\n---\n\n"));
        assert!(md.ends_with("**[https://x](https://x)**\n"));
    }
}
