//! Specificity, cascade ordering and computed-value resolution for the
//! handful of properties the extractor and inspector read.

use super::color::{parse_color, Rgba};
use super::sheet::{component_values, split_commas, Declaration};
use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};
use scraper::Selector;
use std::collections::HashMap;
use std::sync::Arc;

/// Selector specificity packed the way `selectors` computes it:
/// `ids << 20 | classes << 10 | types`, so integer order is cascade order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32);

impl Specificity {
    /// Highest specificity among the selector's comma-separated parts.
    pub fn of(selector: &Selector) -> Self {
        Specificity(selector.selectors.iter().map(|s| s.specificity()).max().unwrap_or(0))
    }

    pub fn ids(self) -> u32 {
        self.0 >> 20
    }

    pub fn classes(self) -> u32 {
        (self.0 >> 10) & 0x3ff
    }

    pub fn types(self) -> u32 {
        self.0 & 0x3ff
    }
}

/// Where a declaration came from. Later origins win at equal importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    UserAgent,
    Author,
    Inline,
}

/// A declaration that applies to one element, with its cascade position.
#[derive(Debug, Clone)]
pub struct Applied<'a> {
    pub declaration: &'a Declaration,
    pub origin: Origin,
    pub specificity: Specificity,
    pub order: usize,
}

impl Applied<'_> {
    fn key(&self) -> (bool, Origin, Specificity, usize) {
        (self.declaration.important, self.origin, self.specificity, self.order)
    }
}

/// Sort applied declarations so the winning one for each property comes last.
pub fn sort_cascade(applied: &mut [Applied<'_>]) {
    applied.sort_by_key(|a| a.key());
}

type CustomProperties = Arc<HashMap<String, String>>;

/// Values the cascade resolves for one element.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub font_family: String,
    pub color: Rgba,
    pub background_color: Rgba,
    custom: CustomProperties,
}

impl Resolved {
    pub fn initial(default_font_family: &str) -> Self {
        Resolved {
            font_family: serialize_font_family(default_font_family),
            color: Rgba::BLACK,
            background_color: Rgba::TRANSPARENT,
            custom: Arc::new(HashMap::new()),
        }
    }
}

enum Keyword {
    Inherit,
    Initial,
    Unset,
}

fn css_wide_keyword(value: &str) -> Option<Keyword> {
    match value.trim().to_ascii_lowercase().as_str() {
        "inherit" => Some(Keyword::Inherit),
        "initial" => Some(Keyword::Initial),
        "unset" | "revert" | "revert-layer" => Some(Keyword::Unset),
        _ => None,
    }
}

/// Resolve one element's values from its sorted declarations and its parent.
pub fn resolve(applied: &[Applied<'_>], parent: &Resolved, initial: &Resolved) -> Resolved {
    let mut custom: Option<HashMap<String, String>> = None;
    for a in applied.iter().filter(|a| a.declaration.property.starts_with("--")) {
        custom
            .get_or_insert_with(|| (*parent.custom).clone())
            .insert(a.declaration.property.clone(), a.declaration.value.clone());
    }
    let custom = custom.map(Arc::new).unwrap_or_else(|| parent.custom.clone());

    let mut font_family = parent.font_family.clone();
    let mut color_value: Option<String> = None;
    let mut background_value: Option<String> = None;

    for a in applied {
        let decl = a.declaration;
        let Some(value) = substitute_vars(&decl.value, &custom) else {
            continue;
        };
        match decl.property.as_str() {
            "font-family" => match css_wide_keyword(&value) {
                Some(Keyword::Initial) => font_family = initial.font_family.clone(),
                Some(_) => font_family = parent.font_family.clone(),
                None => font_family = serialize_font_family(&value),
            },
            "font" => {
                if let Some(family) = font_shorthand_family(&value) {
                    font_family = serialize_font_family(family);
                } else if let Some(Keyword::Initial) = css_wide_keyword(&value) {
                    font_family = initial.font_family.clone();
                } else if css_wide_keyword(&value).is_some() {
                    font_family = parent.font_family.clone();
                }
            }
            "color" => color_value = Some(value),
            "background-color" => background_value = Some(value),
            "background" => background_value = Some(background_shorthand_color(&value)),
            _ => {}
        }
    }

    let color = match color_value {
        None => parent.color,
        Some(v) => match css_wide_keyword(&v) {
            Some(Keyword::Initial) => initial.color,
            Some(_) => parent.color,
            None => parse_color(&v)
                .map(|c| c.resolve(parent.color))
                .unwrap_or(parent.color),
        },
    };

    let background_color = match background_value {
        None => initial.background_color,
        Some(v) => match css_wide_keyword(&v) {
            Some(Keyword::Inherit) => parent.background_color,
            Some(_) => initial.background_color,
            None => parse_color(&v)
                .map(|c| c.resolve(color))
                .unwrap_or(initial.background_color),
        },
    };

    Resolved {
        font_family,
        color,
        background_color,
        custom,
    }
}

const VAR_DEPTH_LIMIT: usize = 16;

/// Replace `var(--x, fallback)` references. `None` when a reference cannot
/// be resolved, in which case the declaration is ignored.
fn substitute_vars(value: &str, custom: &HashMap<String, String>) -> Option<String> {
    let mut current = value.to_string();
    for _ in 0..VAR_DEPTH_LIMIT {
        let (expanded, found) = {
            let mut input = ParserInput::new(&current);
            let mut parser = Parser::new(&mut input);
            let mut out = String::new();
            let mut copied = parser.position();
            let found = expand_var_refs(&mut parser, custom, &mut out, &mut copied).ok()?;
            out.push_str(parser.slice_from(copied));
            (out, found)
        };
        if found == 0 {
            return Some(current);
        }
        current = expanded;
    }
    None
}

/// Copy the parser's input into `out`, replacing every `var()` reference,
/// nested ones included. Returns how many were replaced.
fn expand_var_refs<'i, 't>(
    parser: &mut Parser<'i, 't>,
    custom: &HashMap<String, String>,
    out: &mut String,
    copied: &mut SourcePosition,
) -> Result<usize, ()> {
    let mut found = 0;
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(found),
        };
        match token {
            Token::Function(ref name) if name.eq_ignore_ascii_case("var") => {
                let (name, fallback) = parser
                    .parse_nested_block(|p| {
                        let name = p.expect_ident()?.to_ascii_lowercase();
                        let fallback = match p.next() {
                            Ok(&Token::Comma) => {
                                let rest = p.position();
                                while p.next_including_whitespace_and_comments().is_ok() {}
                                Some(p.slice_from(rest).trim().to_string())
                            }
                            _ => None,
                        };
                        Ok::<_, ParseError<()>>((name, fallback))
                    })
                    .map_err(|_| ())?;
                let replacement = custom.get(&name).cloned().or(fallback).ok_or(())?;
                out.push_str(parser.slice(*copied..start));
                out.push_str(&replacement);
                *copied = parser.position();
                found += 1;
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                found += parser
                    .parse_nested_block(|p| {
                        Ok::<_, ParseError<()>>(expand_var_refs(p, custom, out, copied))
                    })
                    .map_err(|_| ())??;
            }
            _ => {}
        }
    }
}

/// Normalize a `font-family` list the way computed styles serialize it.
pub fn serialize_font_family(value: &str) -> String {
    split_commas(value)
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|family| {
            if family.len() >= 2 && family.starts_with('\'') && family.ends_with('\'') {
                format!("\"{}\"", &family[1..family.len() - 1])
            } else if family.starts_with('"') {
                family.to_string()
            } else {
                family.split_whitespace().collect::<Vec<_>>().join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

const SIZE_KEYWORDS: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
    "smaller", "larger",
];

/// The family part of a `font` shorthand: everything after the size and
/// optional `/line-height`. `None` for system-font keywords or junk.
fn font_shorthand_family(value: &str) -> Option<&str> {
    let tokens = component_values(value);
    let size_idx = tokens.iter().position(|(_, t)| {
        let lower = t.to_ascii_lowercase();
        // Bare numbers are weights; sizes carry a unit or a percentage.
        (t.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            && t.contains(|c: char| c.is_ascii_alphabetic() || c == '%'))
            || SIZE_KEYWORDS.contains(&lower.as_str())
    })?;

    let mut idx = size_idx + 1;
    while let Some((_, t)) = tokens.get(idx) {
        if *t == "/" {
            idx += 2;
        } else {
            break;
        }
    }
    let (offset, _) = tokens.get(idx)?;
    let family = value[*offset..].trim();
    (!family.is_empty()).then_some(family)
}

fn background_shorthand_color(value: &str) -> String {
    let layers = split_commas(value);
    let last = layers.last().copied().unwrap_or(value);
    if let Some(keyword) = css_wide_keyword(last) {
        return match keyword {
            Keyword::Inherit => "inherit".to_string(),
            _ => "initial".to_string(),
        };
    }
    component_values(last)
        .into_iter()
        .map(|(_, t)| t)
        .find(|t| parse_color(t).is_some())
        .map(str::to_string)
        .unwrap_or_else(|| "transparent".to_string())
}
