//! Foreground color choice for color swatches.

use regex::Regex;
use std::sync::OnceLock;

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

/// Approximate perceived brightness in `0.0..=1.0` from the first three
/// integer tokens of a color string. Alpha and anything after the third
/// token are ignored. `None` when fewer than three tokens exist.
pub fn luminance(color: &str) -> Option<f64> {
    let channels: Vec<f64> = digits_re()
        .find_iter(color)
        .take(3)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();
    if channels.len() < 3 {
        return None;
    }
    Some((0.299 * channels[0] + 0.587 * channels[1] + 0.114 * channels[2]) / 255.0)
}

/// Strictly brighter than one half.
pub fn is_light_luminance(luminance: f64) -> bool {
    luminance > 0.5
}

pub fn is_light_color(color: &str) -> bool {
    luminance(color).map(is_light_luminance).unwrap_or(false)
}

/// `#000` on light swatches, `#fff` otherwise
pub fn text_color_for(color: &str) -> &'static str {
    if is_light_color(color) {
        "#000"
    } else {
        "#fff"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_gets_black_text_and_black_gets_white() {
        assert_eq!(text_color_for("rgb(255,255,255)"), "#000");
        assert_eq!(text_color_for("rgb(0,0,0)"), "#fff");
        assert_eq!(text_color_for("rgb(255, 255, 255)"), "#000");
    }

    #[test]
    fn exact_half_is_not_light() {
        assert!(!is_light_luminance(0.5));
        assert_eq!(luminance("rgb(22, 206, 0)"), Some(0.5));
        assert_eq!(text_color_for("rgb(22, 206, 0)"), "#fff");
    }

    #[test]
    fn alpha_is_ignored() {
        assert_eq!(text_color_for("rgba(255, 255, 255, 0)"), "#000");
        // "0.5" splits into the tokens 0 and 5; only the first three count.
        assert_eq!(luminance("rgba(0, 0, 0, 0.5)"), Some(0.0));
    }

    #[test]
    fn unparsable_colors_fall_back_to_white_text() {
        assert_eq!(luminance("transparent"), None);
        assert_eq!(text_color_for("transparent"), "#fff");
    }
}
