//! Markdown → block model for the result panel
//!
//! The review text is parsed once per result and kept as a flat list of
//! blocks. The egui side (`ui::components::markdown_view`) only walks this
//! list, so parsing stays out of the frame loop and can be tested without a UI.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// A run of text sharing one style
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl Span {
    fn same_style(&self, other: &Span) -> bool {
        self.strong == other.strong
            && self.emphasis == other.emphasis
            && self.code == other.code
            && self.link == other.link
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordinal(u64),
    /// Later paragraph of an item that already showed its marker
    Continuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Levels 1 to 3; deeper headings are clamped to 3
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    ListItem {
        depth: usize,
        marker: ListMarker,
        spans: Vec<Span>,
    },
    Quote(Vec<Span>),
    CodeBlock(String),
    Rule,
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    strong: usize,
    emphasis: usize,
    link: Option<String>,
    heading: Option<u8>,
    // next ordinal per open list, None for bullet lists
    lists: Vec<Option<u64>>,
    item_marker: Option<ListMarker>,
    quote_depth: usize,
    code_block: Option<String>,
}

impl BlockBuilder {
    fn push_text(&mut self, text: &str, code: bool) {
        if text.is_empty() {
            return;
        }
        let span = Span {
            text: text.to_string(),
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            code,
            link: self.link.clone(),
        };
        match self.spans.last_mut() {
            Some(last) if last.same_style(&span) => last.text.push_str(&span.text),
            _ => self.spans.push(span),
        }
    }

    fn flush(&mut self) {
        if let Some(last) = self.spans.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
        }
        self.spans.retain(|s| !s.text.is_empty());
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);

        let block = if let Some(level) = self.heading {
            Block::Heading { level, spans }
        } else if let Some(marker) = self.item_marker {
            self.item_marker = Some(ListMarker::Continuation);
            Block::ListItem {
                depth: self.lists.len().saturating_sub(1),
                marker,
                spans,
            }
        } else if self.quote_depth > 0 {
            Block::Quote(spans)
        } else {
            Block::Paragraph(spans)
        };
        self.blocks.push(block);
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(heading_level(level));
            }
            Tag::Paragraph => self.flush(),
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let n = *next;
                        *next += 1;
                        ListMarker::Ordinal(n)
                    }
                    _ => ListMarker::Bullet,
                };
                self.item_marker = Some(marker);
            }
            Tag::BlockQuote { .. } => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.code_block = Some(String::new());
            }
            Tag::HtmlBlock => self.flush(),
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::Link { dest_url, .. } => self.link = Some(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.flush();
                self.heading = None;
            }
            TagEnd::Paragraph => self.flush(),
            TagEnd::Item => {
                self.flush();
                self.item_marker = None;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                // back inside the parent item, if any
                if !self.lists.is_empty() {
                    self.item_marker = Some(ListMarker::Continuation);
                }
            }
            TagEnd::BlockQuote { .. } => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code_block.take() {
                    self.blocks
                        .push(Block::CodeBlock(code.trim_end_matches('\n').to_string()));
                }
            }
            TagEnd::HtmlBlock => self.flush(),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Link => self.link = None,
            _ => {}
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.code_block.as_mut() {
                Some(code) => code.push_str(&text),
                None => self.push_text(&text, false),
            },
            Event::Code(code) => self.push_text(&code, true),
            // raw HTML is shown as written
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html, false),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        _ => 3,
    }
}

/// Parse review text into display blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(markdown, Options::empty()) {
        builder.event(event);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span {
            text: text.to_string(),
            ..Span::default()
        }
    }

    #[test]
    fn heading_and_bullet() {
        let blocks = parse("## Feedback\n- Good structure");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    spans: vec![plain("Feedback")]
                },
                Block::ListItem {
                    depth: 0,
                    marker: ListMarker::Bullet,
                    spans: vec![plain("Good structure")]
                },
            ]
        );
    }

    #[test]
    fn deep_headings_clamp_to_three() {
        let blocks = parse("# One\n\n#### Four");
        assert!(matches!(&blocks[0], Block::Heading { level: 1, .. }));
        assert!(matches!(&blocks[1], Block::Heading { level: 3, .. }));
    }

    #[test]
    fn inline_styles_split_spans() {
        let blocks = parse("Use **bold** and `code` with *care*.");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph, got {:?}", blocks[0]);
        };
        assert_eq!(spans.len(), 7);
        assert_eq!(spans[0], plain("Use "));
        assert!(spans[1].strong && spans[1].text == "bold");
        assert!(spans[3].code && spans[3].text == "code");
        assert!(spans[5].emphasis && spans[5].text == "care");
        assert_eq!(spans[6], plain("."));
    }

    #[test]
    fn soft_breaks_join_lines() {
        let blocks = parse("first line\nsecond line");
        assert_eq!(blocks, vec![Block::Paragraph(vec![plain("first line second line")])]);
    }

    #[test]
    fn ordered_and_nested_lists() {
        let blocks = parse("3. three\n4. four\n   - nested\n");
        assert_eq!(
            blocks,
            vec![
                Block::ListItem {
                    depth: 0,
                    marker: ListMarker::Ordinal(3),
                    spans: vec![plain("three")]
                },
                Block::ListItem {
                    depth: 0,
                    marker: ListMarker::Ordinal(4),
                    spans: vec![plain("four")]
                },
                Block::ListItem {
                    depth: 1,
                    marker: ListMarker::Bullet,
                    spans: vec![plain("nested")]
                },
            ]
        );
    }

    #[test]
    fn blockquote_and_code_block() {
        let blocks = parse("> keep it short\n\n```\nfn main() {\n    run();\n}\n```\n\n---\n");
        assert_eq!(blocks[0], Block::Quote(vec![plain("keep it short")]));
        assert_eq!(blocks[1], Block::CodeBlock("fn main() {\n    run();\n}".to_string()));
        assert_eq!(blocks[2], Block::Rule);
    }

    #[test]
    fn links_keep_their_target() {
        let blocks = parse("[Apply](https://jobs.example.com/1)");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(spans[0].text, "Apply");
        assert_eq!(spans[0].link.as_deref(), Some("https://jobs.example.com/1"));
    }

    #[test]
    fn plain_text_is_one_paragraph() {
        let blocks = parse(crate::constants::UPLOAD_ERROR_MESSAGE);
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![plain(crate::constants::UPLOAD_ERROR_MESSAGE)])]
        );
    }

    #[test]
    fn inline_html_is_kept_as_text() {
        let blocks = parse("Line one<br>line two");
        assert_eq!(blocks, vec![Block::Paragraph(vec![plain("Line one<br>line two")])]);
    }

    #[test]
    fn html_block_becomes_paragraph() {
        let blocks = parse("<div>Hire me</div>\n\n## Next");
        assert_eq!(blocks[0], Block::Paragraph(vec![plain("<div>Hire me</div>")]));
        assert!(matches!(&blocks[1], Block::Heading { level: 2, .. }));
    }

    #[test]
    fn empty_input_has_no_blocks() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n").is_empty());
    }
}
