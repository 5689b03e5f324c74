//! HTML fragment formatters, one per report container.

use super::contrast::text_color_for;
use crate::artifacts::AnimationEntry;
use base64::Engine as _;

/// Generic fallback families hidden when `hide_generic_fonts` is set.
pub const GENERIC_FONT_FAMILIES: &[&str] =
    &["ui-sans-serif", "-apple-system", "system-ui", "sans-serif", "monospace", "serif"];

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Split every `font-family` list on commas and flatten, in order.
/// Duplicates across lists are kept.
pub fn parse_fonts(fonts: &[String], hide_generic: bool) -> Vec<String> {
    fonts
        .iter()
        .flat_map(|font| font.split(',').map(|f| f.trim().to_string()))
        .filter(|f| !(hide_generic && GENERIC_FONT_FAMILIES.contains(&f.as_str())))
        .collect()
}

pub fn fonts_fragment(fonts: &[String], hide_generic: bool) -> String {
    escape_text(&parse_fonts(fonts, hide_generic).join(", "))
}

pub fn color_article(color: &str) -> String {
    format!(
        "<article style=\"background-color: {bg}; color: {fg};\">\n  <p>{text}</p>\n</article>",
        bg = escape_attr(color),
        fg = text_color_for(color),
        text = escape_text(color),
    )
}

pub fn colors_fragment(colors: &[String]) -> String {
    colors.iter().map(|c| color_article(c)).collect()
}

pub fn image_link(src: &str) -> String {
    let src = escape_attr(src);
    format!(
        "<a href=\"{src}\" target=\"_blank\" rel=\"noopener noreferrer\">\n  \
         <img src=\"{src}\" style=\"max-width: 100%; margin-bottom: 10px;\" />\n</a>",
        src = src
    )
}

pub fn images_fragment(images: &[String]) -> String {
    images.iter().map(|src| image_link(src)).collect()
}

pub fn animation_article(entry: &AnimationEntry) -> String {
    let mut out = String::from("<article class=\"animation\">\n");
    out.push_str(&format!("  <h3>{}</h3>\n", escape_text(&entry.selector)));
    if let Some(animation) = &entry.animation {
        out.push_str(&format!("  <p><strong>animation:</strong> {}</p>\n", escape_text(animation)));
    }
    if let Some(transition) = &entry.transition {
        out.push_str(&format!("  <p><strong>transition:</strong> {}</p>\n", escape_text(transition)));
    }
    out.push_str(&format!(
        "  <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>\n</article>",
        escape_attr(&entry.source),
        escape_text(&entry.source)
    ));
    out
}

pub fn animations_fragment(entries: &[AnimationEntry]) -> String {
    if entries.is_empty() {
        return "<p>No animations or transitions found.</p>".to_string();
    }
    entries.iter().map(animation_article).collect()
}

/// A `data:` URL that opens the raw SVG markup on its own.
pub fn svg_data_url(markup: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(markup.as_bytes())
    )
}

pub fn inline_svg_icon(markup: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"icon\">{}</a>",
        svg_data_url(markup),
        markup
    )
}

pub fn svg_image_icon(src: &str) -> String {
    let src = escape_attr(src);
    format!(
        "<a href=\"{src}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"icon\"><img src=\"{src}\" /></a>",
        src = src
    )
}

pub fn icons_fragment(inline_svgs: &[String], svg_images: &[String]) -> String {
    inline_svgs
        .iter()
        .map(|m| inline_svg_icon(m))
        .chain(svg_images.iter().map(|s| svg_image_icon(s)))
        .collect()
}
