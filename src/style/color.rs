//! CSS color values and their computed-style serialization.
//!
//! Computed colors are always reported the way browsers report them from
//! `getComputedStyle`: `rgb(R, G, B)` when opaque, `rgba(R, G, B, A)` otherwise.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 1.0 };
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0.0 };

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    /// Serialize as a computed value (`rgb(0, 0, 0)` / `rgba(0, 0, 0, 0.5)`)
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let a = (self.a.max(0.0) * 1000.0).round() / 1000.0;
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, a)
        }
    }
}

/// A specified color before `currentcolor` is resolved against the element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorValue {
    Rgba(Rgba),
    CurrentColor,
}

impl ColorValue {
    pub fn resolve(self, current: Rgba) -> Rgba {
        match self {
            ColorValue::Rgba(c) => c,
            ColorValue::CurrentColor => current,
        }
    }
}

/// Parse a specified CSS color. Returns `None` for anything not a color.
pub fn parse_color(input: &str) -> Option<ColorValue> {
    let s = input.trim();
    let lower = s.to_ascii_lowercase();

    if lower == "currentcolor" {
        return Some(ColorValue::CurrentColor);
    }
    if lower == "transparent" {
        return Some(ColorValue::Rgba(Rgba::TRANSPARENT));
    }
    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex).map(ColorValue::Rgba);
    }
    if let Some((name, args)) = split_function(&lower) {
        return match name {
            "rgb" | "rgba" => parse_rgb_args(args).map(ColorValue::Rgba),
            "hsl" | "hsla" => parse_hsl_args(args).map(ColorValue::Rgba),
            _ => None,
        };
    }
    named_color(&lower).map(|(r, g, b)| ColorValue::Rgba(Rgba::opaque(r, g, b)))
}

fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    Some((s[..open].trim(), inner))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::opaque(digit(0)?, digit(1)?, digit(2)?)),
        4 => Some(Rgba {
            r: digit(0)?,
            g: digit(1)?,
            b: digit(2)?,
            a: digit(3)? as f64 / 255.0,
        }),
        6 => Some(Rgba::opaque(pair(0)?, pair(2)?, pair(4)?)),
        8 => Some(Rgba {
            r: pair(0)?,
            g: pair(2)?,
            b: pair(4)?,
            a: pair(6)? as f64 / 255.0,
        }),
        _ => None,
    }
}

/// Split function arguments in either legacy (`1, 2, 3`) or modern
/// (`1 2 3 / 0.5`) syntax into channel tokens and an optional alpha token.
fn split_args(args: &str) -> Option<(Vec<&str>, Option<&str>)> {
    if args.contains(',') {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        match parts.len() {
            3 => Some((parts, None)),
            4 => Some((parts[..3].to_vec(), Some(parts[3]))),
            _ => None,
        }
    } else {
        let (channels, alpha) = match args.split_once('/') {
            Some((c, a)) => (c, Some(a.trim())),
            None => (args, None),
        };
        let parts: Vec<&str> = channels.split_whitespace().collect();
        if parts.len() != 3 {
            return None;
        }
        Some((parts, alpha))
    }
}

fn parse_alpha(token: Option<&str>) -> Option<f64> {
    match token {
        None => Some(1.0),
        Some(t) => {
            let v = match t.strip_suffix('%') {
                Some(p) => p.trim().parse::<f64>().ok()? / 100.0,
                None => t.parse::<f64>().ok()?,
            };
            Some(v.clamp(0.0, 1.0))
        }
    }
}

fn parse_channel(token: &str) -> Option<u8> {
    let v = match token.strip_suffix('%') {
        Some(p) => p.trim().parse::<f64>().ok()? * 2.55,
        None => token.parse::<f64>().ok()?,
    };
    Some(v.round().clamp(0.0, 255.0) as u8)
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let (channels, alpha) = split_args(args)?;
    Some(Rgba {
        r: parse_channel(channels[0])?,
        g: parse_channel(channels[1])?,
        b: parse_channel(channels[2])?,
        a: parse_alpha(alpha)?,
    })
}

fn parse_hue(token: &str) -> Option<f64> {
    let deg = if let Some(v) = token.strip_suffix("deg") {
        v.parse::<f64>().ok()?
    } else if let Some(v) = token.strip_suffix("turn") {
        v.parse::<f64>().ok()? * 360.0
    } else if let Some(v) = token.strip_suffix("rad") {
        v.parse::<f64>().ok()?.to_degrees()
    } else {
        token.parse::<f64>().ok()?
    };
    Some(deg.rem_euclid(360.0))
}

fn parse_percent(token: &str) -> Option<f64> {
    let v = token.strip_suffix('%').unwrap_or(token).parse::<f64>().ok()?;
    Some((v / 100.0).clamp(0.0, 1.0))
}

fn parse_hsl_args(args: &str) -> Option<Rgba> {
    let (channels, alpha) = split_args(args)?;
    let h = parse_hue(channels[0])? / 360.0;
    let s = parse_percent(channels[1])?;
    let l = parse_percent(channels[2])?;

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let to_u8 = |t: f64| (hue_to_rgb(p, q, t) * 255.0).round().clamp(0.0, 255.0) as u8;

    Some(Rgba {
        r: to_u8(h + 1.0 / 3.0),
        g: to_u8(h),
        b: to_u8(h - 1.0 / 3.0),
        a: parse_alpha(alpha)?,
    })
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    NAMED_COLORS
        .binary_search_by(|(n, _)| n.cmp(&name))
        .ok()
        .map(|i| NAMED_COLORS[i].1)
}

// Sorted for binary search.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("aliceblue", (240, 248, 255)),
    ("antiquewhite", (250, 235, 215)),
    ("aqua", (0, 255, 255)),
    ("aquamarine", (127, 255, 212)),
    ("azure", (240, 255, 255)),
    ("beige", (245, 245, 220)),
    ("bisque", (255, 228, 196)),
    ("black", (0, 0, 0)),
    ("blanchedalmond", (255, 235, 205)),
    ("blue", (0, 0, 255)),
    ("blueviolet", (138, 43, 226)),
    ("brown", (165, 42, 42)),
    ("burlywood", (222, 184, 135)),
    ("cadetblue", (95, 158, 160)),
    ("chartreuse", (127, 255, 0)),
    ("chocolate", (210, 105, 30)),
    ("coral", (255, 127, 80)),
    ("cornflowerblue", (100, 149, 237)),
    ("cornsilk", (255, 248, 220)),
    ("crimson", (220, 20, 60)),
    ("cyan", (0, 255, 255)),
    ("darkblue", (0, 0, 139)),
    ("darkcyan", (0, 139, 139)),
    ("darkgoldenrod", (184, 134, 11)),
    ("darkgray", (169, 169, 169)),
    ("darkgreen", (0, 100, 0)),
    ("darkgrey", (169, 169, 169)),
    ("darkkhaki", (189, 183, 107)),
    ("darkmagenta", (139, 0, 139)),
    ("darkolivegreen", (85, 107, 47)),
    ("darkorange", (255, 140, 0)),
    ("darkorchid", (153, 50, 204)),
    ("darkred", (139, 0, 0)),
    ("darksalmon", (233, 150, 122)),
    ("darkseagreen", (143, 188, 143)),
    ("darkslateblue", (72, 61, 139)),
    ("darkslategray", (47, 79, 79)),
    ("darkslategrey", (47, 79, 79)),
    ("darkturquoise", (0, 206, 209)),
    ("darkviolet", (148, 0, 211)),
    ("deeppink", (255, 20, 147)),
    ("deepskyblue", (0, 191, 255)),
    ("dimgray", (105, 105, 105)),
    ("dimgrey", (105, 105, 105)),
    ("dodgerblue", (30, 144, 255)),
    ("firebrick", (178, 34, 34)),
    ("floralwhite", (255, 250, 240)),
    ("forestgreen", (34, 139, 34)),
    ("fuchsia", (255, 0, 255)),
    ("gainsboro", (220, 220, 220)),
    ("ghostwhite", (248, 248, 255)),
    ("gold", (255, 215, 0)),
    ("goldenrod", (218, 165, 32)),
    ("gray", (128, 128, 128)),
    ("green", (0, 128, 0)),
    ("greenyellow", (173, 255, 47)),
    ("grey", (128, 128, 128)),
    ("honeydew", (240, 255, 240)),
    ("hotpink", (255, 105, 180)),
    ("indianred", (205, 92, 92)),
    ("indigo", (75, 0, 130)),
    ("ivory", (255, 255, 240)),
    ("khaki", (240, 230, 140)),
    ("lavender", (230, 230, 250)),
    ("lavenderblush", (255, 240, 245)),
    ("lawngreen", (124, 252, 0)),
    ("lemonchiffon", (255, 250, 205)),
    ("lightblue", (173, 216, 230)),
    ("lightcoral", (240, 128, 128)),
    ("lightcyan", (224, 255, 255)),
    ("lightgoldenrodyellow", (250, 250, 210)),
    ("lightgray", (211, 211, 211)),
    ("lightgreen", (144, 238, 144)),
    ("lightgrey", (211, 211, 211)),
    ("lightpink", (255, 182, 193)),
    ("lightsalmon", (255, 160, 122)),
    ("lightseagreen", (32, 178, 170)),
    ("lightskyblue", (135, 206, 250)),
    ("lightslategray", (119, 136, 153)),
    ("lightslategrey", (119, 136, 153)),
    ("lightsteelblue", (176, 196, 222)),
    ("lightyellow", (255, 255, 224)),
    ("lime", (0, 255, 0)),
    ("limegreen", (50, 205, 50)),
    ("linen", (250, 240, 230)),
    ("magenta", (255, 0, 255)),
    ("maroon", (128, 0, 0)),
    ("mediumaquamarine", (102, 205, 170)),
    ("mediumblue", (0, 0, 205)),
    ("mediumorchid", (186, 85, 211)),
    ("mediumpurple", (147, 112, 219)),
    ("mediumseagreen", (60, 179, 113)),
    ("mediumslateblue", (123, 104, 238)),
    ("mediumspringgreen", (0, 250, 154)),
    ("mediumturquoise", (72, 209, 204)),
    ("mediumvioletred", (199, 21, 133)),
    ("midnightblue", (25, 25, 112)),
    ("mintcream", (245, 255, 250)),
    ("mistyrose", (255, 228, 225)),
    ("moccasin", (255, 228, 181)),
    ("navajowhite", (255, 222, 173)),
    ("navy", (0, 0, 128)),
    ("oldlace", (253, 245, 230)),
    ("olive", (128, 128, 0)),
    ("olivedrab", (107, 142, 35)),
    ("orange", (255, 165, 0)),
    ("orangered", (255, 69, 0)),
    ("orchid", (218, 112, 214)),
    ("palegoldenrod", (238, 232, 170)),
    ("palegreen", (152, 251, 152)),
    ("paleturquoise", (175, 238, 238)),
    ("palevioletred", (219, 112, 147)),
    ("papayawhip", (255, 239, 213)),
    ("peachpuff", (255, 218, 185)),
    ("peru", (205, 133, 63)),
    ("pink", (255, 192, 203)),
    ("plum", (221, 160, 221)),
    ("powderblue", (176, 224, 230)),
    ("purple", (128, 0, 128)),
    ("rebeccapurple", (102, 51, 153)),
    ("red", (255, 0, 0)),
    ("rosybrown", (188, 143, 143)),
    ("royalblue", (65, 105, 225)),
    ("saddlebrown", (139, 69, 19)),
    ("salmon", (250, 128, 114)),
    ("sandybrown", (244, 164, 96)),
    ("seagreen", (46, 139, 87)),
    ("seashell", (255, 245, 238)),
    ("sienna", (160, 82, 45)),
    ("silver", (192, 192, 192)),
    ("skyblue", (135, 206, 235)),
    ("slateblue", (106, 90, 205)),
    ("slategray", (112, 128, 144)),
    ("slategrey", (112, 128, 144)),
    ("snow", (255, 250, 250)),
    ("springgreen", (0, 255, 127)),
    ("steelblue", (70, 130, 180)),
    ("tan", (210, 180, 140)),
    ("teal", (0, 128, 128)),
    ("thistle", (216, 191, 216)),
    ("tomato", (255, 99, 71)),
    ("turquoise", (64, 224, 208)),
    ("violet", (238, 130, 238)),
    ("wheat", (245, 222, 179)),
    ("white", (255, 255, 255)),
    ("whitesmoke", (245, 245, 245)),
    ("yellow", (255, 255, 0)),
    ("yellowgreen", (154, 205, 50)),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn css(input: &str) -> String {
        parse_color(input).unwrap().resolve(Rgba::BLACK).to_css()
    }

    #[test]
    fn named_table_is_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn serializes_like_computed_style() {
        assert_eq!(css("red"), "rgb(255, 0, 0)");
        assert_eq!(css("#FFF"), "rgb(255, 255, 255)");
        assert_eq!(css("#336699"), "rgb(51, 102, 153)");
        assert_eq!(css("rgba(10,20,30,0.5)"), "rgba(10, 20, 30, 0.5)");
        assert_eq!(css("rgb(10 20 30 / 50%)"), "rgba(10, 20, 30, 0.5)");
        assert_eq!(css("transparent"), "rgba(0, 0, 0, 0)");
        assert_eq!(css("hsl(120, 100%, 25%)"), "rgb(0, 128, 0)");
        assert_eq!(css("rgb(100%, 0%, 0%)"), "rgb(255, 0, 0)");
    }

    #[test]
    fn current_color_resolves_against_element() {
        let c = parse_color("currentColor").unwrap();
        assert_eq!(c.resolve(Rgba::opaque(1, 2, 3)).to_css(), "rgb(1, 2, 3)");
    }

    #[test]
    fn rejects_non_colors() {
        assert!(parse_color("12px").is_none());
        assert!(parse_color("#12").is_none());
        assert!(parse_color("rgb(1,2)").is_none());
        assert!(parse_color("url(a.png)").is_none());
    }
}
