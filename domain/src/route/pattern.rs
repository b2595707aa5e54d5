//! Raw route pattern normalization.
//!
//! The backing API declares routes as anchored regular expressions with
//! router-level tokens:
//!
//! ```text
//! ^{prefix}/{lookup}/(?P<slug>[a-z-]+(?:\.[a-z]+)?){trailing_slash}$
//! ```
//!
//! [`normalize_pattern`] rewrites such a pattern into the portable template
//! form used everywhere else:
//!
//! ```text
//! /tasks/{pk}/{slug}/
//! ```

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid placeholder regex"));

/// Router-level values substituted into raw patterns
#[derive(Debug, Clone, Copy)]
pub struct PatternContext<'a> {
    pub prefix: &'a str,
    pub lookup_field: &'a str,
    pub trailing_slash: bool,
}

/// Rewrite a raw route pattern into a `{name}` path template.
pub fn normalize_pattern(raw: &str, ctx: PatternContext<'_>) -> String {
    let substituted = raw
        .replace("{prefix}", ctx.prefix)
        .replace("{lookup}", &format!("{{{}}}", ctx.lookup_field))
        .replace(
            "{trailing_slash}",
            if ctx.trailing_slash { "/" } else { "" },
        );

    let unanchored = substituted
        .trim_start_matches('^')
        .trim_end_matches('$')
        .replace("\\.", ".");

    let rewritten = rewrite_named_groups(&unanchored);

    let mut path = format!("/{}", rewritten);
    while path.contains("//") {
        path = path.replace("//", "/");
    }
    path
}

/// Replace every `(?P<name>...)` group with `{name}`.
///
/// The group body may contain nested parentheses and escaped characters.
fn rewrite_named_groups(pattern: &str) -> String {
    const OPEN: &str = "(?P<";

    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(name_end) = after_open.find('>') else {
            // Not a well-formed group, keep the remainder verbatim
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after_open[..name_end];
        let body = &after_open[name_end + 1..];

        match closing_paren(body) {
            Some(close) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
                rest = &body[close + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Index of the `)` closing a group whose opening paren was already consumed.
fn closing_paren(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut escaped = false;
    let mut in_class = false;

    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Placeholder names in a path template, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER.captures_iter(template) {
        let name = cap[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Replace each `{name}` token of `template` in a single pass.
///
/// `value` returns the replacement for a name, or `None` to keep the token.
/// Replacement text is never rescanned.
pub fn substitute_placeholders<F>(template: &str, mut value: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            value(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Whether any `{...}` token is left in a path.
pub fn has_placeholder(path: &str) -> bool {
    PLACEHOLDER.is_match(path)
}
