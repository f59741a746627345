//! HTML export of document content.
//!
//! Output is a pure function of the content: blocks in order, each split into
//! entity ranges and then style runs. Block and inline markup come from the
//! lookup tables below; keys missing from a table fall back to its default
//! entry (paragraph for blocks, no wrapping for inline styles).

use std::fmt;

use markdown_weaver_escape::{FmtWriter, StrWrite, escape_html};

use crate::content::{ContentBlock, ContentState};
use crate::style::{BlockType, InlineStyle};

/// Markup for one inline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineTag {
    pub style: &'static str,
    pub open: &'static str,
    pub close: &'static str,
}

/// Inline styles with markup, in the order they open within a run.
pub const INLINE_TAGS: &[InlineTag] = &[
    InlineTag {
        style: "BOLD",
        open: r#"<span style="font-weight:bold;">"#,
        close: "</span>",
    },
    InlineTag {
        style: "ITALIC",
        open: r#"<span style="font-style:italic;">"#,
        close: "</span>",
    },
    InlineTag {
        style: "UNDERLINE",
        open: r#"<span style="text-decoration:underline;">"#,
        close: "</span>",
    },
    InlineTag {
        style: "lineThrough",
        open: r#"<span style="text-decoration:line-through;">"#,
        close: "</span>",
    },
    InlineTag {
        style: "CODE",
        open: "<code>",
        close: "</code>",
    },
];

/// Markup for one block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTag {
    pub element: &'static str,
    pub class: Option<&'static str>,
    /// Wrapping list element shared by consecutive blocks of this type.
    pub list: Option<ListTag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTag {
    pub element: &'static str,
    pub class: &'static str,
}

const fn plain(element: &'static str) -> BlockTag {
    BlockTag {
        element,
        class: None,
        list: None,
    }
}

const fn classed(element: &'static str, class: &'static str) -> BlockTag {
    BlockTag {
        element,
        class: Some(class),
        list: None,
    }
}

const fn list_item(element: &'static str, class: &'static str) -> BlockTag {
    BlockTag {
        element: "li",
        class: None,
        list: Some(ListTag { element, class }),
    }
}

/// Used for unstyled blocks and any key missing from `BLOCK_TAGS`.
pub const DEFAULT_BLOCK_TAG: BlockTag = plain("p");

/// Block keys with markup.
pub const BLOCK_TAGS: &[(&str, BlockTag)] = &[
    ("unstyled", DEFAULT_BLOCK_TAG),
    ("header-one", plain("h1")),
    ("header-two", plain("h2")),
    ("header-three", plain("h3")),
    ("header-four", plain("h4")),
    ("header-five", plain("h5")),
    ("header-six", plain("h6")),
    ("blockquote", classed("blockquote", "RichEditor-blockquote")),
    (
        "unordered-list-item",
        list_item("ul", "public-DraftStyleDefault-ul"),
    ),
    (
        "ordered-list-item",
        list_item("ol", "public-DraftStyleDefault-ol"),
    ),
    ("code-block", classed("pre", "public-DraftStyleDefault-pre")),
    ("CENTERED_BLOCK", classed("div", "RichEditor-CENTERED_BLOCK")),
    ("JUSTIFY_BLOCK", classed("div", "RichEditor-JUSTIFY_BLOCK")),
    ("LEFT_BLOCK", classed("div", "RichEditor-LEFT_BLOCK")),
    ("RIGHT_BLOCK", classed("div", "RichEditor-RIGHT_BLOCK")),
];

pub fn block_tag(block_type: &BlockType) -> BlockTag {
    let key = block_type.key();
    BLOCK_TAGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, tag)| *tag)
        .unwrap_or(DEFAULT_BLOCK_TAG)
}

pub fn inline_tag(style: &InlineStyle) -> Option<&'static InlineTag> {
    INLINE_TAGS.iter().find(|tag| tag.style == style.key())
}

/// Writes content as HTML to any `StrWrite` sink.
pub struct HtmlWriter<'a, W: StrWrite> {
    content: &'a ContentState,
    writer: W,
    open_list: Option<ListTag>,
}

impl<'a, W: StrWrite> HtmlWriter<'a, W> {
    pub fn new(content: &'a ContentState, writer: W) -> Self {
        Self {
            content,
            writer,
            open_list: None,
        }
    }

    pub fn run(mut self) -> Result<(), W::Error> {
        for block in self.content.blocks() {
            self.write_block(block)?;
        }
        self.close_list()
    }

    fn write_block(&mut self, block: &ContentBlock) -> Result<(), W::Error> {
        let tag = block_tag(&block.block_type);
        if self.open_list != tag.list {
            self.close_list()?;
            if let Some(list) = tag.list {
                write!(self.writer, "<{} class=\"{}\">", list.element, list.class)?;
                self.open_list = Some(list);
            }
        }

        match tag.class {
            Some(class) => write!(self.writer, "<{} class=\"{}\">", tag.element, class)?,
            None => write!(self.writer, "<{}>", tag.element)?,
        }
        self.write_entities(block)?;
        write!(self.writer, "</{}>", tag.element)
    }

    fn close_list(&mut self) -> Result<(), W::Error> {
        if let Some(list) = self.open_list.take() {
            write!(self.writer, "</{}>", list.element)?;
        }
        Ok(())
    }

    fn write_entities(&mut self, block: &ContentBlock) -> Result<(), W::Error> {
        for (range, entity) in block.entity_ranges() {
            let url = entity
                .and_then(|key| self.content.entity(key))
                .filter(|entity| entity.is_link())
                .and_then(|entity| entity.url());
            match url {
                Some(url) => {
                    self.writer.write_str("<a href=\"")?;
                    escape_html(&mut self.writer, url)?;
                    self.writer.write_str("\">")?;
                    self.write_runs(block, range)?;
                    self.writer.write_str("</a>")?;
                }
                None => self.write_runs(block, range)?,
            }
        }
        Ok(())
    }

    fn write_runs(
        &mut self,
        block: &ContentBlock,
        range: std::ops::Range<usize>,
    ) -> Result<(), W::Error> {
        for run in block.style_ranges(range) {
            let style = &block.chars[run.start].style;
            let tags: Vec<&InlineTag> = INLINE_TAGS
                .iter()
                .filter(|tag| style.iter().any(|s| s.key() == tag.style))
                .collect();
            for tag in &tags {
                self.writer.write_str(tag.open)?;
            }
            escape_html(&mut self.writer, block.slice(run))?;
            for tag in tags.iter().rev() {
                self.writer.write_str(tag.close)?;
            }
        }
        Ok(())
    }
}

/// Write content as HTML into a `String`.
pub fn write_html_fmt(out: &mut String, content: &ContentState) -> fmt::Result {
    HtmlWriter::new(content, FmtWriter(out)).run()
}

/// Serialize content to an HTML string.
pub fn serialize(content: &ContentState) -> String {
    let mut out = String::new();
    if let Err(err) = write_html_fmt(&mut out, content) {
        tracing::warn!(%err, "html serialization failed");
    }
    out
}
