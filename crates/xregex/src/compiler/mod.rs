// Pattern compiler
// Rewrites an augmented pattern into native (JS flavor) syntax by running the
// token registry over it, then hands the result to the native engine.
mod builtin_tokens;
pub(crate) mod flags;
pub(crate) mod native_syntax;
mod native_tokens;
pub mod token_registry;

use std::rc::Rc;

use log::trace;
use smol_str::SmolStr;

use crate::engine::{EngineOption, XRegexError, XResult};
use token_registry::{Scope, TokenContext, TokenRule};

pub(crate) use builtin_tokens::register_builtin_tokens;
pub(crate) use flags::{native_flags, sorted_flags};

/// Result of rewriting, before the native engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompileOutput {
    pub native_source: String,
    pub native_flags: String,
    pub group_names: Vec<Option<SmolStr>>,
    /// Caller flags, sorted
    pub flags: String,
}

/// Rewrite `source` under `flags` using `rules` (newest first).
pub(crate) fn compile_source(
    source: &str,
    flags: &str,
    rules: &[Rc<TokenRule>],
    known_flags: &str,
    option: &EngineOption,
) -> XResult<CompileOutput> {
    let prepared = flags::prepare_flags(source, flags, |c| known_flags.contains(c))?;
    let active_flags = prepared.flags.as_str();

    let mut input: Rc<str> = Rc::from(prepared.pattern);
    let mut output = String::with_capacity(input.len());
    let mut group_names: Vec<Option<SmolStr>> = Vec::new();
    let mut scope = Scope::Default;
    let mut pos = 0;
    let mut reparse_depth = 0;
    // per rule: no match of it starts before this offset
    let mut next_start = vec![0usize; rules.len()];

    while pos < input.len() {
        let lead = input[pos..].chars().next();
        let mut applied: Option<(&TokenRule, String, usize)> = None;

        for (i, rule) in rules.iter().enumerate() {
            if pos < next_start[i] || !rule.may_apply(scope, active_flags, lead) {
                continue;
            }
            let Some(m) = rule.matcher.exec_at(&input, pos, false, false)? else {
                next_start[i] = usize::MAX;
                continue;
            };
            if m.index() != pos {
                next_start[i] = m.index();
                continue;
            }
            if m.is_empty() {
                continue;
            }
            let mut ctx = TokenContext {
                scope,
                flags: active_flags,
                capture_names: &mut group_names,
            };
            let result = (rule.handler)(&m, &mut ctx).map_err(|e| e.with_offset(pos))?;
            if let Some(out) = result {
                applied = Some((&**rule, out, m.as_str().len()));
                break;
            }
        }

        match applied {
            Some((rule, out, len)) if rule.reparse => {
                reparse_depth += 1;
                if reparse_depth > option.max_reparse_depth {
                    return Err(XRegexError::syntax_at(
                        format!(
                            "Token reparse limit of {} exceeded",
                            option.max_reparse_depth
                        ),
                        pos,
                    ));
                }
                trace!("reparse at {}: {:?} -> {:?}", pos, &input[pos..pos + len], out);
                let mut spliced = String::with_capacity(input.len() + out.len());
                spliced.push_str(&input[..pos]);
                spliced.push_str(&out);
                spliced.push_str(&input[pos + len..]);
                input = Rc::from(spliced);
                next_start.fill(0);
            }
            Some((_, out, len)) => {
                trace!("token at {}: {:?} -> {:?}", pos, &input[pos..pos + len], out);
                output.push_str(&out);
                pos += len;
                reparse_depth = 0;
            }
            None => {
                let len = native_tokens::token_len(&input, pos, scope);
                let token = &input[pos..pos + len];
                output.push_str(token);
                if token == "[" && scope == Scope::Default {
                    scope = Scope::Class;
                } else if token == "]" && scope == Scope::Class {
                    scope = Scope::Default;
                }
                pos += len;
                reparse_depth = 0;
            }
        }
    }

    Ok(CompileOutput {
        native_source: collapse_empty_groups(&output),
        native_flags: native_flags(active_flags),
        group_names,
        flags: sorted_flags(flags),
    })
}

/// Collapse runs of `(?:)` into one, skipping escaped characters.
fn collapse_empty_groups(pattern: &str) -> String {
    const EMPTY: &str = "(?:)";
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    let mut last_was_empty = false;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with(EMPTY) {
            if !last_was_empty {
                out.push_str(EMPTY);
            }
            last_was_empty = true;
            rest = &rest[EMPTY.len()..];
            continue;
        }
        last_was_empty = false;
        let mut len = c.len_utf8();
        if c == '\\' {
            len += rest[1..].chars().next().map_or(0, char::len_utf8);
        }
        out.push_str(&rest[..len]);
        rest = &rest[len..];
    }
    out
}
