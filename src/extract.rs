//! Collect an [`ArtifactSet`] from a styled document.

use crate::artifacts::ArtifactSet;
use crate::style::StyledDocument;

/// Push `value` unless an identical string is already present.
fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Walk every element in document order and gather fonts, colors, images,
/// stylesheet links and SVG icons.
///
/// Fonts and colors are deduplicated by exact string equality of the computed
/// value. Text colors and background colors are deduplicated separately and
/// concatenated in that order.
pub fn collect_artifacts(doc: &StyledDocument) -> ArtifactSet {
    let mut fonts = Vec::new();
    let mut text_colors = Vec::new();
    let mut background_colors = Vec::new();
    let mut images = Vec::new();
    let mut external_css_links = Vec::new();
    let mut inline_svgs = Vec::new();

    for el in doc.elements() {
        push_unique(&mut fonts, &el.style.font_family);
        push_unique(&mut text_colors, &el.style.color);
        push_unique(&mut background_colors, &el.style.background_color);

        match el.tag.as_str() {
            "img" => images.push(match el.attr("src") {
                Some(src) if !src.is_empty() => doc.resolve_url(src),
                _ => String::new(),
            }),
            "link" if el.attr("rel").map_or(false, |rel| rel.eq_ignore_ascii_case("stylesheet")) => {
                if let Some(href) = el.attr("href") {
                    external_css_links.push(doc.resolve_url(href));
                }
            }
            "svg" => {
                if let Some(markup) = &el.outer_html {
                    inline_svgs.push(markup.clone());
                }
            }
            _ => {}
        }
    }

    let svg_images = images.iter().filter(|src| src.ends_with(".svg")).cloned().collect();

    let mut colors = text_colors;
    colors.extend(background_colors);

    ArtifactSet {
        fonts,
        colors,
        images,
        external_css_links,
        inline_svgs,
        svg_images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ParsedCss;

    fn doc(html: &str) -> StyledDocument {
        StyledDocument::build(html, Some("https://site.test/"), &ParsedCss::new(), "serif")
    }

    #[test]
    fn dedupes_fonts_and_colors_in_first_seen_order() {
        let d = doc(r#"<html><head><style>
            body { font-family: Arial; color: rgb(0, 0, 0); }
            .a { font-family: Georgia; color: #fff; background: black; }
            .b { font-family: Arial; color: white; }
        </style></head><body><p class="a">1</p><p class="b">2</p><p class="a">3</p></body></html>"#);
        let set = collect_artifacts(&d);
        // html/head/style inherit the initial family before body sets Arial.
        assert_eq!(set.fonts, vec!["serif", "Arial", "Georgia"]);
        assert_eq!(
            set.colors,
            vec!["rgb(0, 0, 0)", "rgb(255, 255, 255)", "rgba(0, 0, 0, 0)", "rgb(0, 0, 0)"]
        );
    }

    #[test]
    fn exact_string_dedup_is_not_semantic() {
        let d = doc(r#"<p style="background-color: rgba(0,0,0,0)">x</p><p style="background-color: rgba(255,255,255,0)">y</p>"#);
        let set = collect_artifacts(&d);
        assert!(set.colors.contains(&"rgba(0, 0, 0, 0)".to_string()));
        assert!(set.colors.contains(&"rgba(255, 255, 255, 0)".to_string()));
    }

    #[test]
    fn collects_images_links_and_svgs() {
        let d = doc(r#"<html><head>
            <link rel="stylesheet" href="/main.css">
            <link rel="icon" href="/favicon.ico">
        </head><body>
            <img src="logo.svg"><img src="photo.png"><img>
            <svg width="10"><circle r="4"/></svg>
        </body></html>"#);
        let set = collect_artifacts(&d);
        assert_eq!(
            set.images,
            vec!["https://site.test/logo.svg", "https://site.test/photo.png", ""]
        );
        assert_eq!(set.svg_images, vec!["https://site.test/logo.svg"]);
        assert_eq!(set.external_css_links, vec!["https://site.test/main.css"]);
        assert_eq!(set.inline_svgs.len(), 1);
        assert!(set.inline_svgs[0].contains("<circle"));
    }

    #[test]
    fn stylesheet_rel_matches_case_insensitively() {
        let d = doc(r#"<link rel="StyleSheet" href="/a.css"><link REL="STYLESHEET" href="/b.css"><link rel="alternate stylesheet" href="/c.css">"#);
        let set = collect_artifacts(&d);
        assert_eq!(
            set.external_css_links,
            vec!["https://site.test/a.css", "https://site.test/b.css"]
        );
    }
}
