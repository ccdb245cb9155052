//! Markdown rendering and excerpt handling

use anyhow::Result;
use pulldown_cmark::{html, Event, Options, Parser};

/// Markdown renderer for content bodies and excerpts
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // YAML metadata blocks stay off; front-matter is handled
        // separately in FrontMatter::parse()
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        Ok(html_output)
    }

    /// Render markdown down to plain text, for one-line feed excerpts
    pub fn render_plain(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Options::empty());
        let mut out = String::new();
        for event in parser {
            match event {
                Event::Text(text) | Event::Code(text) => out.push_str(&text),
                Event::SoftBreak | Event::HardBreak => out.push(' '),
                _ => {}
            }
        }
        out.trim().to_string()
    }

    /// Parse excerpt from content (split by <!-- more -->).
    /// Returns (excerpt, full content with the marker removed).
    pub fn split_excerpt(content: &str) -> (Option<String>, String) {
        if let Some(pos) = content.find("<!-- more -->") {
            let excerpt = content[..pos].trim().to_string();
            let remaining = content[pos + 13..].trim().to_string();
            let full = format!("{}\n\n{}", excerpt, remaining);
            (Some(excerpt), full)
        } else {
            (None, content.to_string())
        }
    }

    /// First paragraph of a body, as an excerpt fallback
    pub fn first_paragraph(content: &str) -> Option<String> {
        content
            .split("\n\n")
            .map(str::trim)
            .find(|p| !p.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_plain_strips_markup() {
        let renderer = MarkdownRenderer::new();
        let plain = renderer.render_plain("Some *emphasis* and `code` here.");
        assert_eq!(plain, "Some emphasis and code here.");
    }

    #[test]
    fn test_split_excerpt() {
        let content = "This is excerpt.\n<!-- more -->\nThis is more content.";
        let (excerpt, full) = MarkdownRenderer::split_excerpt(content);
        assert_eq!(excerpt, Some("This is excerpt.".to_string()));
        assert!(full.contains("This is excerpt."));
        assert!(full.contains("This is more content."));
    }

    #[test]
    fn test_first_paragraph_fallback() {
        let body = "\n\nOpening paragraph.\n\nSecond paragraph.";
        assert_eq!(
            MarkdownRenderer::first_paragraph(body),
            Some("Opening paragraph.".to_string())
        );
        assert_eq!(MarkdownRenderer::first_paragraph("   \n\n  "), None);
    }
}
