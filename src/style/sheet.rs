//! Stylesheet parsing for the cascade.
//!
//! Built on the `cssparser` tokenizer, so comments, strings, escapes and
//! nested blocks are handled by the same rules browsers use. Rules nested in
//! `@media`/`@supports` blocks come out intact; conditional group rules are
//! flattened and their conditions are not evaluated.

use cssparser::{Delimiter, ParseError, Parser, ParserInput, SourcePosition, Token};
use log::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name
    pub property: String,
    pub value: String,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

// At-rules whose blocks contain ordinary style rules.
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "layer", "container", "document"];

pub fn parse_stylesheet(css: &str) -> Vec<StyleRule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();
    parse_rule_list(&mut parser, &mut rules);
    rules
}

fn parse_rule_list<'i, 't>(parser: &mut Parser<'i, 't>, out: &mut Vec<StyleRule>) {
    loop {
        parser.skip_whitespace();
        let start = parser.position();
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::AtKeyword(name) => skip_or_flatten_at_rule(parser, &name.to_ascii_lowercase(), out),
            // `<!--`/`-->` are ignored at the top level; a bare block has no selector.
            Token::CDO | Token::CDC | Token::CurlyBracketBlock => {}
            _ => parse_style_rule(parser, start, out),
        }
    }
}

/// Consume an at-rule's prelude and block. Grouping rules contribute the
/// style rules inside them; everything else is skipped.
fn skip_or_flatten_at_rule<'i, 't>(parser: &mut Parser<'i, 't>, name: &str, out: &mut Vec<StyleRule>) {
    loop {
        match parser.next() {
            Ok(Token::CurlyBracketBlock) => {
                if GROUPING_AT_RULES.contains(&name) {
                    let _ = parser.parse_nested_block(|p| {
                        parse_rule_list(p, out);
                        Ok::<_, ParseError<()>>(())
                    });
                } else {
                    trace!("skipping @{} block", name);
                }
                return;
            }
            Ok(Token::Semicolon) | Err(_) => return,
            Ok(_) => {}
        }
    }
}

fn parse_style_rule<'i, 't>(
    parser: &mut Parser<'i, 't>,
    start: SourcePosition,
    out: &mut Vec<StyleRule>,
) {
    loop {
        let before = parser.position();
        match parser.next() {
            Ok(Token::CurlyBracketBlock) => {
                let selector = parser.slice(start..before).trim().to_string();
                let declarations = parser
                    .parse_nested_block(|p| Ok::<_, ParseError<()>>(parse_declaration_list(p)))
                    .unwrap_or_default();
                out.push(StyleRule {
                    selector,
                    declarations,
                });
                return;
            }
            Ok(_) => {}
            // A prelude running into end of input has no block: drop it.
            Err(_) => return,
        }
    }
}

/// Parse the inside of a declaration block (or a `style` attribute).
pub fn parse_declarations(block: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(block);
    let mut parser = Parser::new(&mut input);
    parse_declaration_list(&mut parser)
}

fn parse_declaration_list<'i, 't>(parser: &mut Parser<'i, 't>) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    while !parser.is_exhausted() {
        if let Ok(Some(declaration)) =
            parser.parse_until_after(Delimiter::Semicolon, |p| parse_declaration(p))
        {
            declarations.push(declaration);
        }
    }
    declarations
}

fn parse_declaration<'i, 't>(parser: &mut Parser<'i, 't>) -> Result<Option<Declaration>, ParseError<'i, ()>> {
    let property = parser.expect_ident()?.to_ascii_lowercase();
    parser.expect_colon()?;
    parser.skip_whitespace();
    let start = parser.position();
    let mut important_at = None;
    loop {
        let before = parser.position();
        match parser.next() {
            Ok(&Token::Delim('!')) => {
                if parser.expect_ident_matching("important").is_ok() && parser.is_exhausted() {
                    important_at = Some(before);
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    let value = match important_at {
        Some(end) => parser.slice(start..end),
        None => parser.slice_from(start),
    }
    .trim();
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(Declaration {
        property,
        value: value.to_string(),
        important: important_at.is_some(),
    }))
}

/// Split on top-level commas; commas inside strings and blocks stay put.
pub(crate) fn split_commas(input: &str) -> Vec<&str> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    let mut parts = Vec::new();
    loop {
        let start = parser.position();
        let _ = parser.parse_until_before(Delimiter::Comma, |p| {
            while p.next_including_whitespace_and_comments().is_ok() {}
            Ok::<_, ParseError<()>>(())
        });
        parts.push(parser.slice_from(start));
        if parser.next().is_err() {
            break;
        }
    }
    parts
}

/// Top-level component values with their byte offsets. Functions and
/// bracketed blocks come out whole; a `/` is its own value.
pub(crate) fn component_values(input: &str) -> Vec<(usize, &str)> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    let mut values = Vec::new();
    loop {
        parser.skip_whitespace();
        let start = parser.position();
        let opens_block = match parser.next_including_whitespace() {
            Ok(token) => matches!(
                token,
                Token::Function(_)
                    | Token::ParenthesisBlock
                    | Token::SquareBracketBlock
                    | Token::CurlyBracketBlock
            ),
            Err(_) => break,
        };
        if opens_block {
            let _ = parser.parse_nested_block(|p| {
                while p.next_including_whitespace_and_comments().is_ok() {}
                Ok::<_, ParseError<()>>(())
            });
        }
        let text = parser.slice_from(start);
        values.push((start.byte_index(), text));
    }
    values
}
