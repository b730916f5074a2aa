use std::borrow::Cow;
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

use crate::utils::markdown::{escape_html, safe_markdown_to_html, sanitize_html};

const WORDS_PER_MINUTE: f64 = 200.0;
const MAX_BLOCKS: usize = 500;
const MAX_LIST_ITEMS: usize = 100;

/// One unit of rendered blog content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph {
        text: String,
    },
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Image {
        url: String,
        #[serde(default)]
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Code {
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    List {
        items: Vec<String>,
        #[serde(default)]
        ordered: bool,
    },
    Quote {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
}

fn default_heading_level() -> u8 {
    2
}

impl ContentBlock {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Image { .. } => "image",
            ContentBlock::Code { .. } => "code",
            ContentBlock::List { .. } => "list",
            ContentBlock::Quote { .. } => "quote",
        }
    }

    fn check(&self) -> Result<(), &'static str> {
        match self {
            ContentBlock::Paragraph { text } | ContentBlock::Quote { text, .. } => {
                if text.trim().is_empty() {
                    return Err("text cannot be empty");
                }
            }
            ContentBlock::Heading { text, level } => {
                if text.trim().is_empty() {
                    return Err("heading text cannot be empty");
                }
                if !(1..=6).contains(level) {
                    return Err("heading level must be between 1 and 6");
                }
            }
            ContentBlock::Image { url, .. } => {
                let parsed = url::Url::parse(url).map_err(|_| "image url is invalid")?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err("image url must start with http:// or https://");
                }
            }
            ContentBlock::Code { code, language } => {
                if code.trim().is_empty() {
                    return Err("code cannot be empty");
                }
                if let Some(lang) = language {
                    if !lang.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '#' | '_')) {
                        return Err("code language contains invalid characters");
                    }
                }
            }
            ContentBlock::List { items, .. } => {
                if items.is_empty() {
                    return Err("list needs at least one item");
                }
                if items.len() > MAX_LIST_ITEMS {
                    return Err("list has too many items");
                }
                if items.iter().any(|item| item.trim().is_empty()) {
                    return Err("list items cannot be empty");
                }
            }
        }
        Ok(())
    }

    fn push_words(&self, prose: &mut usize, code_words: &mut usize) {
        let count = |s: &str| s.split_whitespace().count();
        match self {
            ContentBlock::Paragraph { text } | ContentBlock::Heading { text, .. } => *prose += count(text),
            ContentBlock::Quote { text, author } => {
                *prose += count(text) + author.as_deref().map_or(0, count);
            }
            ContentBlock::Image { alt, caption, .. } => {
                *prose += count(alt) + caption.as_deref().map_or(0, count);
            }
            ContentBlock::List { items, .. } => *prose += items.iter().map(|i| count(i)).sum::<usize>(),
            ContentBlock::Code { code, .. } => *code_words += count(code),
        }
    }

    fn render_into(&self, out: &mut String) -> fmt::Result {
        match self {
            ContentBlock::Paragraph { text } => out.push_str(&safe_markdown_to_html(text)),
            ContentBlock::Heading { text, level } => {
                let level = (*level).clamp(1, 6);
                write!(out, "<h{level} id=\"{}\">{}</h{level}>", slug::slugify(text), escape_html(text))?;
            }
            ContentBlock::Image { url, alt, caption } => {
                write!(out, "<figure><img src=\"{}\" alt=\"{}\">", escape_html(url), escape_html(alt))?;
                if let Some(caption) = caption {
                    write!(out, "<figcaption>{}</figcaption>", escape_html(caption))?;
                }
                out.push_str("</figure>");
            }
            ContentBlock::Code { code, language } => {
                match language {
                    Some(lang) => write!(out, "<pre><code class=\"language-{}\">", escape_html(lang))?,
                    None => out.push_str("<pre><code>"),
                }
                write!(out, "{}</code></pre>", escape_html(code))?;
            }
            ContentBlock::List { items, ordered } => {
                let tag = if *ordered { "ol" } else { "ul" };
                write!(out, "<{tag}>")?;
                for item in items {
                    write!(out, "<li>{}</li>", escape_html(item))?;
                }
                write!(out, "</{tag}>")?;
            }
            ContentBlock::Quote { text, author } => {
                write!(out, "<blockquote><p>{}</p>", escape_html(text))?;
                if let Some(author) = author {
                    write!(out, "<cite>{}</cite>", escape_html(author))?;
                }
                out.push_str("</blockquote>");
            }
        }
        Ok(())
    }
}

/// Validates a post body, reporting the first offending block by index.
pub fn validate_content_blocks(blocks: &[ContentBlock]) -> Result<(), ValidationError> {
    if blocks.is_empty() {
        return Err(block_error("content_empty", "Content needs at least one block".into()));
    }
    if blocks.len() > MAX_BLOCKS {
        return Err(block_error("content_too_long", format!("Content is limited to {MAX_BLOCKS} blocks").into()));
    }

    for (index, block) in blocks.iter().enumerate() {
        if let Err(reason) = block.check() {
            return Err(block_error(
                "invalid_block",
                format!("Block {} ({}): {}", index, block.kind(), reason).into(),
            ));
        }
    }
    Ok(())
}

/// Same checks as [`validate_content_blocks`], wrapped for use-case callers.
pub fn validate_content(blocks: &[ContentBlock]) -> Result<(), ValidationErrors> {
    validate_content_blocks(blocks).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("content", e);
        errors
    })
}

fn block_error(code: &'static str, message: Cow<'static, str>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message);
    err
}

/// Words across all blocks; code counts at half weight.
pub fn word_count(blocks: &[ContentBlock]) -> usize {
    let (mut prose, mut code) = (0, 0);
    for block in blocks {
        block.push_words(&mut prose, &mut code);
    }
    prose + code.div_ceil(2)
}

/// Minutes at 200 wpm, rounded up, never below one.
pub fn estimate_reading_time(blocks: &[ContentBlock]) -> i32 {
    let minutes = (word_count(blocks) as f64 / WORDS_PER_MINUTE).ceil() as i32;
    minutes.max(1)
}

pub fn render_blocks_to_html(blocks: &[ContentBlock]) -> String {
    let mut html = String::with_capacity(blocks.len() * 128);
    for block in blocks {
        // Writing to a String cannot fail
        let _ = block.render_into(&mut html);
    }
    sanitize_html(&html)
}
