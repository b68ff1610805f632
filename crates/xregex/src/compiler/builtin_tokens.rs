// Built-in token rules
// Registered once per engine, in priority order from lowest to highest.

use std::rc::Rc;

use smol_str::SmolStr;

use super::native_tokens::interval_len;
use super::token_registry::{
    Scope, TokenContext, TokenHandler, TokenOptions, TokenRegistry, TokenScope,
};
use crate::engine::xre_limits::MAX_CODE_POINT;
use crate::engine::{EngineOption, XRegexError, XResult};
use crate::pattern::{CompiledArtifact, MatchResult};

const INVALID_ESCAPE: &str = r"\\(?:[ABCE-OQRTUVXYZaeg-moqyz]|[pP](?!\{)|c(?![A-Za-z])|u(?![\dA-Fa-f]{4}|\{[\dA-Fa-f]+\})|x(?![\dA-Fa-f]{2}))";
const CODE_POINT_ESCAPE: &str = r"\\u\{([\dA-Fa-f]+)\}";
const EMPTY_CLASS: &str = r"\[(\^?)\]";
const INLINE_COMMENT: &str = r"\(\?#[^)]*\)";
const FREE_SPACING: &str = r"(?:\s|#.*)+";
const NAMED_BACKREF: &str = r"\\k<([\w$]+)>";
const NUMBERED_ESCAPE: &str = r"\\(\d+)";
const NAMED_GROUP: &str = r"\(\?P?<([\w$]+)>";
const PLAIN_GROUP: &str = r"\((?!\?)";

const GROUP_OPENERS: [&str; 5] = ["(?:", "(?=", "(?!", "(?<=", "(?<!"];

pub(crate) fn register_builtin_tokens(
    registry: &mut TokenRegistry,
    option: &EngineOption,
) -> XResult<()> {
    let mut add = |source: &str, options: TokenOptions, rule_handler: TokenHandler| -> XResult<()> {
        let matcher =
            CompiledArtifact::build(source.to_string(), String::new(), None, None, None, option)?;
        registry.register(Rc::new(matcher), rule_handler, options)
    };

    add(
        INVALID_ESCAPE,
        TokenOptions::default().scope(TokenScope::All).lead_char('\\'),
        handler(|m, ctx| {
            // \B is a word-boundary assertion outside classes
            if m.as_str() == "\\B" && ctx.scope() == Scope::Default {
                return Ok(Some(m.as_str().to_string()));
            }
            Err(XRegexError::syntax_at(
                format!("Invalid escape {}", m.as_str()),
                m.index(),
            ))
        }),
    )?;

    add(
        CODE_POINT_ESCAPE,
        TokenOptions::default().scope(TokenScope::All).lead_char('\\'),
        handler(|m, ctx| {
            let code = u32::from_str_radix(m.get(1).unwrap_or(""), 16)
                .ok()
                .filter(|&c| c <= MAX_CODE_POINT);
            match code {
                None => Err(XRegexError::syntax_at(
                    format!("Invalid Unicode code point {}", m.as_str()),
                    m.index(),
                )),
                Some(c) if c <= 0xFFFF => Ok(Some(format!("\\u{:04x}", c))),
                Some(_) if ctx.has_flag('u') => Ok(Some(m.as_str().to_string())),
                Some(_) => Err(XRegexError::syntax_at(
                    "Cannot use Unicode code point above \\u{FFFF} without flag u",
                    m.index(),
                )),
            }
        }),
    )?;

    add(
        EMPTY_CLASS,
        TokenOptions::default().lead_char('['),
        handler(|m, _| {
            let negated = m.get(1).is_some_and(|c| !c.is_empty());
            Ok(Some(if negated { "[\\s\\S]" } else { "\\b\\B" }.to_string()))
        }),
    )?;

    add(
        INLINE_COMMENT,
        TokenOptions::default().lead_char('('),
        handler(|m, ctx| Ok(Some(contextual_separator(m, ctx.flags())))),
    )?;

    add(
        FREE_SPACING,
        TokenOptions::default().flag("x"),
        handler(|m, ctx| Ok(Some(contextual_separator(m, ctx.flags())))),
    )?;

    add(
        NAMED_BACKREF,
        TokenOptions::default().lead_char('\\'),
        handler(|m, ctx| {
            let name = m.get(1).unwrap_or("");
            let index = if name.bytes().all(|b| b.is_ascii_digit()) {
                name.parse::<usize>().ok()
            } else {
                ctx.name_index(name)
            };
            let Some(index) = index.filter(|&i| i >= 1 && i <= ctx.capture_count()) else {
                return Err(XRegexError::syntax_at(
                    format!("Backreference to undefined group {}", m.as_str()),
                    m.index(),
                ));
            };
            let mut out = String::from("\\");
            out.push_str(itoa::Buffer::new().format(index));
            // keep a following digit from extending the group number
            if m.after().starts_with(|c: char| c.is_ascii_digit()) {
                out.push_str("(?:)");
            }
            Ok(Some(out))
        }),
    )?;

    add(
        NUMBERED_ESCAPE,
        TokenOptions::default().scope(TokenScope::All).lead_char('\\'),
        handler(|m, ctx| {
            let digits = m.get(1).unwrap_or("");
            let backref = ctx.scope() == Scope::Default
                && !digits.starts_with('0')
                && digits.parse::<usize>().is_ok_and(|n| n <= ctx.capture_count());
            if backref || digits == "0" {
                return Ok(Some(m.as_str().to_string()));
            }
            Err(XRegexError::syntax_at(
                format!(
                    "Cannot use octal escape or backreference to undefined group {}",
                    m.as_str()
                ),
                m.index(),
            ))
        }),
    )?;

    add(
        NAMED_GROUP,
        TokenOptions::default().lead_char('('),
        handler(|m, ctx| {
            let name = m.get(1).unwrap_or("");
            if name.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(XRegexError::syntax_at(
                    format!("Cannot use a digit to start capture name {}", m.as_str()),
                    m.index(),
                ));
            }
            ctx.add_capture(Some(SmolStr::new(name)))
                .map_err(|e| e.with_offset(m.index()))?;
            Ok(Some("(".to_string()))
        }),
    )?;

    add(
        PLAIN_GROUP,
        TokenOptions::default().optional_flags("n").lead_char('('),
        handler(|_, ctx| {
            if ctx.has_flag('n') {
                return Ok(Some("(?:".to_string()));
            }
            ctx.add_capture(None)?;
            Ok(Some("(".to_string()))
        }),
    )?;

    Ok(())
}

fn handler<F>(f: F) -> TokenHandler
where
    F: Fn(&MatchResult, &mut TokenContext<'_>) -> XResult<Option<String>> + 'static,
{
    Rc::new(f)
}

/// What a removed comment or run of whitespace leaves behind: nothing where
/// the neighbours cannot merge, `(?:)` where they could (as in `\1 0` under
/// flag `x`, which must not become `\10`).
pub(crate) fn contextual_separator(m: &MatchResult, flags: &str) -> String {
    let before = m.before();
    let after = m.after();
    let isolated = before.is_empty()
        || after.is_empty()
        || before.ends_with(['(', '|'])
        || after.starts_with([')', '|'])
        || GROUP_OPENERS.iter().any(|opener| before.ends_with(*opener))
        || quantifier_next(after, flags.contains('x'));
    if isolated {
        String::new()
    } else {
        "(?:)".to_string()
    }
}

/// Whether a quantifier follows once comments (and, under `x`, whitespace
/// and line comments) are skipped.
fn quantifier_next(mut rest: &str, free_spacing: bool) -> bool {
    loop {
        if let Some(comment) = rest.strip_prefix("(?#")
            && let Some(close) = comment.find(')')
        {
            rest = &comment[close + 1..];
            continue;
        }
        if free_spacing {
            let trimmed = rest.trim_start_matches(is_js_whitespace);
            if trimmed.len() != rest.len() {
                rest = trimmed;
                continue;
            }
            if rest.starts_with('#') {
                rest = rest.find('\n').map_or("", |i| &rest[i..]);
                continue;
            }
        }
        break;
    }
    rest.starts_with(['?', '*', '+']) || interval_len(rest.as_bytes()) > 0
}

fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}
