use serde::{Deserialize, Serialize};
use tera::escape_html;
use testology_core::models::chunk::InterpretationChunk;

/// Output format for a rendered chunk list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderFormat {
    #[default]
    Markdown,
    Html,
}

pub fn render(chunks: &[InterpretationChunk], format: RenderFormat) -> String {
    match format {
        RenderFormat::Markdown => chunks_to_markdown(chunks),
        RenderFormat::Html => chunks_to_html(chunks),
    }
}

/// Render each chunk as one `<div>` block, in input order.
///
/// High-priority chunks get the `high-priority` class. Text is escaped and
/// newlines in the body become `<br>`.
pub fn chunks_to_html(chunks: &[InterpretationChunk]) -> String {
    chunks
        .iter()
        .map(chunk_to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

fn chunk_to_html(chunk: &InterpretationChunk) -> String {
    let class = if chunk.is_high_priority() {
        "interpretation-chunk high-priority"
    } else {
        "interpretation-chunk"
    };

    let mut block = format!(
        "<div class=\"{class}\" data-chunk-id=\"{}\">",
        escape_html(&chunk.id)
    );
    if let Some(title) = &chunk.title {
        block.push_str(&format!("<h3>{}</h3>", escape_html(title)));
    }
    block.push_str(&format!(
        "<p>{}</p>",
        escape_html(&chunk.body).replace('\n', "<br>")
    ));
    block.push_str("</div>");
    block
}

/// Render each chunk as one Markdown block, in input order, separated by a
/// blank line. High-priority blocks start with a warning sign.
pub fn chunks_to_markdown(chunks: &[InterpretationChunk]) -> String {
    chunks
        .iter()
        .map(chunk_to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn chunk_to_markdown(chunk: &InterpretationChunk) -> String {
    let mut block = String::new();
    if chunk.is_high_priority() {
        block.push_str("⚠️ ");
    }
    if let Some(title) = &chunk.title {
        block.push_str(&format!("**{title}**\n\n"));
    }
    block.push_str(&chunk.body);
    block
}
