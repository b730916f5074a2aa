use pulldown_cmark::{html, Options, Parser};
use ammonia::{Builder, UrlRelative};

/// Converts Markdown content to sanitized HTML to prevent XSS attacks.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);

    sanitize_html(&raw_html)
}

/// Strips unsafe markup and forces safe link attributes.
pub fn sanitize_html(content: &str) -> String {
    let mut builder = Builder::default();
    builder
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::PassThrough)
        .add_generic_attributes(&["id"])
        .add_tag_attributes("code", &["class"])
        .add_tag_attributes("ol", &["start"]);

    builder.clean(content).to_string()
}

/// Escapes text for use inside HTML elements and attribute values.
pub fn escape_html(text: &str) -> String {
    ammonia::clean_text(text)
}
