//! Macro expansion of authored rules into canonical rules
//!
//! Authored rules may use shorthand that the parser does not accept. The
//! expander rewrites one authored string into zero or more canonical strings
//! through an ordered pipeline of pure stages:
//!
//! | Stage | Shorthand | Example |
//! |-------|-----------|---------|
//! | presets | named or life-like preset | `B3/S23` |
//! | normalize | empty bracket, leading bracket | `[][x] => a` → `_[_][x] => a` |
//! | repeats | repeated group | `a[x]3 => b` → `a[x][x][x] => b` |
//! | alternatives | top-level `\|` in the source | `a[x] \| a[y] => b` |
//! | source wildcard | `state%` in the source | `t%[x] => t` |
//! | target wildcard | bare `%` target | `a => b%` |
//! | rotation | `%N` target | `a3 => b%2` → `a3 => b5` |
//! | pointing | neighbor facing this cell | `_[t.] => a` |
//!
//! Each stage maps one rule string to a list; the pipeline flat-maps stages
//! left to right, so output order is deterministic. Canonical input passes
//! through unchanged.

use crate::cell::is_symbol;
use crate::{preset, Direction, Error, Result};

/// A single expansion stage over one rule string
pub type Stage = fn(&str) -> Result<Vec<String>>;

/// Stages after preset substitution, in application order
pub const STAGES: [(&str, Stage); 7] = [
    ("normalize", normalize_brackets),
    ("repeats", expand_repeats),
    ("alternatives", split_alternatives),
    ("source wildcard", expand_source_wildcard),
    ("target wildcard", expand_target_wildcard),
    ("rotation", expand_rotation),
    ("pointing", expand_pointing),
];

/// Most copies a repeated group may expand to (one per neighbor slot)
const MAX_REPEAT: usize = 6;

/// Most `[x.]` markers in one rule; each binds its own neighbor slot
const MAX_POINTING: usize = 6;

/// Expand one authored rule into canonical rule strings
///
/// An entry that rewrites to nothing (e.g. ` => b`) is an expansion error.
pub fn expand_rule(text: &str) -> Result<Vec<String>> {
    let mut rules = preset::expand_preset(text).unwrap_or_else(|| vec![text.trim().to_string()]);
    for (name, stage) in STAGES {
        rules = apply_stage(rules, stage)?;
        tracing::trace!("Stage '{}' on '{}': {} rule(s)", name, text.trim(), rules.len());
    }
    if rules.is_empty() {
        return Err(Error::expansion(text.trim(), "expands to no rules"));
    }
    Ok(rules)
}

/// Run a stage over every rule in a list, keeping order
pub fn apply_stage(rules: Vec<String>, stage: Stage) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(rules.len());
    for rule in &rules {
        out.extend(stage(rule)?);
    }
    Ok(out)
}

/// Split free-form rules text into individual rules
///
/// Rules are separated by newlines or `;`. Entries are trimmed and blank
/// entries dropped.
pub fn split_rules_text(text: &str) -> Vec<String> {
    text.split(['\n', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn split_rule(rule: &str) -> Result<(&str, &str)> {
    rule.split_once("=>")
        .map(|(source, target)| (source.trim(), target.trim()))
        .ok_or_else(|| Error::expansion(rule, "missing '=>'"))
}

fn join(source: &str, target: &str) -> String {
    format!("{source} => {target}")
}

/// `[]` means an empty neighbor; a source starting with a group gets `_`
pub fn normalize_brackets(rule: &str) -> Result<Vec<String>> {
    let (source, target) = split_rule(rule)?;
    let mut source = source.replace("[]", "[_]");
    if source.starts_with('[') {
        source.insert(0, '_');
    }
    Ok(vec![join(&source, target)])
}

/// `[X]N` becomes N copies of `[X]`
pub fn expand_repeats(rule: &str) -> Result<Vec<String>> {
    let (source, target) = split_rule(rule)?;
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let close = rest[open..]
            .find(']')
            .map(|i| open + i)
            .ok_or_else(|| Error::expansion(rule, "unclosed '['"))?;
        let block = &rest[open..=close];
        let after = &rest[close + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();

        if digits == 0 {
            out.push_str(block);
        } else {
            let count: usize = after[..digits]
                .parse()
                .map_err(|_| Error::expansion(rule, "invalid repeat count"))?;
            if count > MAX_REPEAT {
                return Err(Error::expansion(
                    rule,
                    format!("repeat count {count} exceeds {MAX_REPEAT} neighbors"),
                ));
            }
            for _ in 0..count {
                out.push_str(block);
            }
        }
        rest = &after[digits..];
    }
    out.push_str(rest);
    Ok(vec![join(&out, target)])
}

/// Split the source on `|` outside brackets; each part keeps the target
pub fn split_alternatives(rule: &str) -> Result<Vec<String>> {
    let (source, target) = split_rule(rule)?;
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in source.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);

    Ok(parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| join(p, target))
        .collect())
}

/// Whether `text` contains a symbol immediately followed by `%`
fn has_wildcard(text: &str) -> bool {
    text.as_bytes()
        .windows(2)
        .any(|w| is_symbol(w[0] as char) && w[1] == b'%')
}

/// Replace every `symbol%` in `text` with `symbol<d>`
fn fill_wildcards(text: &str, direction: Direction) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    for c in text.chars() {
        if c == '%' && prev.is_some_and(is_symbol) {
            out.push_str(&direction.to_string());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// `t%` in the source (with no `%` in the target) becomes six rules, one per facing
pub fn expand_source_wildcard(rule: &str) -> Result<Vec<String>> {
    let (source, target) = split_rule(rule)?;
    if !has_wildcard(source) || has_wildcard(target) {
        return Ok(vec![join(source, target)]);
    }
    Ok(Direction::ALL
        .iter()
        .map(|&d| join(&fill_wildcards(source, d), target))
        .collect())
}

/// A target of exactly `state%` becomes six rules, one per target facing
pub fn expand_target_wildcard(rule: &str) -> Result<Vec<String>> {
    let (source, target) = split_rule(rule)?;
    match target.as_bytes() {
        [state, b'%'] if is_symbol(*state as char) => Ok(Direction::ALL
            .iter()
            .map(|d| join(source, &format!("{}{d}", *state as char)))
            .collect()),
        _ => Ok(vec![join(source, target)]),
    }
}

/// `state%N` targets become fixed facings rotated from the source facing
///
/// A source with a fixed facing yields one rule; otherwise the source facing
/// is pinned to each of the six directions in turn. A directionless source is
/// pinned as well, so `a => b%2` only fires on facing `a` cells: a
/// directionless `a` is left alone rather than turned into a `b` with an
/// arbitrary facing.
pub fn expand_rotation(rule: &str) -> Result<Vec<String>> {
    let (source, target) = split_rule(rule)?;
    let Some((target_state, digits)) = target.split_once('%') else {
        return Ok(vec![join(source, target)]);
    };
    if target_state.len() != 1 || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Ok(vec![join(source, target)]);
    }
    let amount = digits
        .parse::<u32>()
        .map(|n| (n % 6) as u8)
        .map_err(|_| Error::expansion(rule, "invalid rotation amount"))?;

    let mut chars = source.chars();
    let source_state = chars
        .next()
        .ok_or_else(|| Error::expansion(rule, "empty source"))?;
    let remainder = chars.as_str();

    match remainder.chars().next() {
        Some(c) if c.is_ascii_digit() => {
            let from = Direction::from_char(c)
                .ok_or_else(|| Error::expansion(rule, format!("invalid source direction '{c}'")))?;
            Ok(vec![join(
                source,
                &format!("{target_state}{}", from.rotate(amount)),
            )])
        }
        next => {
            let conditions = if next == Some('%') {
                &remainder[1..]
            } else {
                remainder
            };
            Ok(Direction::ALL
                .iter()
                .map(|&d| {
                    join(
                        &format!("{source_state}{d}{conditions}"),
                        &format!("{target_state}{}", d.rotate(amount)),
                    )
                })
                .collect())
        }
    }
}

fn is_pointing_marker(w: &[u8]) -> bool {
    w[0] == b'[' && is_symbol(w[1] as char) && w[2] == b'.' && w[3] == b']'
}

/// Byte offset and state of the first `[x.]` marker
fn find_pointing(source: &str) -> Option<(usize, char)> {
    source
        .as_bytes()
        .windows(4)
        .position(is_pointing_marker)
        .map(|i| (i, source.as_bytes()[i + 1] as char))
}

/// `[x.]` becomes six rules: slot D holds `x` facing back toward this cell
///
/// Several markers expand one at a time, so two markers give 36 rules. More
/// than six markers can never bind distinct slots and are rejected.
pub fn expand_pointing(rule: &str) -> Result<Vec<String>> {
    let (source, target) = split_rule(rule)?;
    let markers = source.as_bytes().windows(4).filter(|w| is_pointing_marker(w)).count();
    if markers > MAX_POINTING {
        return Err(Error::expansion(
            rule,
            format!("{markers} pointing conditions exceed {MAX_POINTING} neighbors"),
        ));
    }
    let Some((start, state)) = find_pointing(source) else {
        return Ok(vec![join(source, target)]);
    };

    let mut out = Vec::new();
    for d in Direction::ALL {
        let replaced = format!(
            "{}[{d}{state}{}]{}",
            &source[..start],
            d.opposite(),
            &source[start + 4..]
        );
        out.extend(expand_pointing(&join(&replaced, target))?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_rule;

    fn expand(text: &str) -> Vec<String> {
        expand_rule(text).unwrap()
    }

    #[test]
    fn test_canonical_is_idempotent() {
        for text in [
            "a => b",
            "a3 => b1",
            "a[x] => b",
            "_[1t4] => a",
            "a[a][a][a|_][_][_][_] => a",
            "a[-2x|y] => b.3",
        ] {
            assert_eq!(expand(text), vec![text.to_string()]);
        }
    }

    #[test]
    fn test_bracket_normalization() {
        assert_eq!(expand("a[] => b"), vec!["a[_] => b"]);
        assert_eq!(expand("[x] => a"), vec!["_[x] => a"]);
        assert_eq!(expand("[] => a"), vec!["_[_] => a"]);
    }

    #[test]
    fn test_repeats() {
        assert_eq!(expand("a[x]3 => b"), vec!["a[x][x][x] => b"]);
        assert_eq!(expand("_[a]2[_|b]1 => a"), vec!["_[a][a][_|b] => a"]);
        assert_eq!(expand("a[x]0[y] => b"), vec!["a[y] => b"]);
        assert!(matches!(
            expand_rule("a[x]7 => b"),
            Err(Error::Expansion { .. })
        ));
        assert!(matches!(
            expand_rule("a[x => b"),
            Err(Error::Expansion { .. })
        ));
    }

    #[test]
    fn test_alternatives() {
        assert_eq!(
            expand("a[_|a][_]2 | a[a]2 => _"),
            vec!["a[_|a][_][_] => _", "a[a][a] => _"]
        );
        // `|` inside a group is condition OR, not a rule split
        assert_eq!(expand("a[x|y] => b"), vec!["a[x|y] => b"]);
        assert_eq!(expand("a || b => c"), vec!["a => c", "b => c"]);
    }

    #[test]
    fn test_source_wildcard() {
        let rules = expand("t%[x] => t");
        assert_eq!(rules.len(), 6);
        assert_eq!(rules[0], "t1[x] => t");
        assert_eq!(rules[5], "t6[x] => t");

        // Conditions share the substituted facing
        assert_eq!(expand("t%[y%] => a")[2], "t3[y3] => a");

        // A `%` target leaves the source wildcard to the rotation stages
        let rules = expand("t% => t%1");
        assert_eq!(rules.len(), 6);
        assert_eq!(rules[0], "t1 => t2");
    }

    #[test]
    fn test_target_wildcard() {
        let rules = expand("a => b%");
        assert_eq!(
            rules,
            vec!["a => b1", "a => b2", "a => b3", "a => b4", "a => b5", "a => b6"]
        );
    }

    #[test]
    fn test_rotation_with_fixed_source() {
        assert_eq!(expand("a3 => b%2"), vec!["a3 => b5"]);
        assert_eq!(expand("a6[x] => b%1"), vec!["a6[x] => b1"]);
        assert_eq!(expand("a1 => b%6"), vec!["a1 => b1"]);
    }

    #[test]
    fn test_rotation_branches_without_fixed_source() {
        let rules = expand("a => b%2");
        assert_eq!(rules.len(), 6);
        assert_eq!(rules[2], "a3 => b5");

        let rules = expand("t%[x] => t%1");
        assert_eq!(
            rules,
            vec![
                "t1[x] => t2",
                "t2[x] => t3",
                "t3[x] => t4",
                "t4[x] => t5",
                "t5[x] => t6",
                "t6[x] => t1",
            ]
        );
    }

    #[test]
    fn test_pointing_expansion() {
        let rules = expand("_[t.] => a");
        assert_eq!(
            rules,
            vec![
                "_[1t4] => a",
                "_[2t5] => a",
                "_[3t6] => a",
                "_[4t1] => a",
                "_[5t2] => a",
                "_[6t3] => a",
            ]
        );

        assert_eq!(expand("_[t.][x.] => a").len(), 36);
        assert_eq!(expand("[t.] => a")[0], "_[1t4] => a");
    }

    #[test]
    fn test_everything_expanded_parses() {
        for text in [
            "[t.]2 => a",
            "t%[-x] => t%",
            "a[]3[b]3 | b[]6 => c%",
            "B3/S23",
            "B2/S34",
        ] {
            for rule in expand(text) {
                assert!(parse_rule(&rule).is_ok(), "{text} produced unparsable {rule}");
            }
        }
    }

    #[test]
    fn test_empty_expansion_is_an_error() {
        for text in [" => b", "| => b", "|| => b"] {
            assert!(
                matches!(expand_rule(text), Err(Error::Expansion { .. })),
                "{text:?} should not expand silently"
            );
        }
    }

    #[test]
    fn test_pointing_marker_limit() {
        assert_eq!(expand("_[t.]2 => a").len(), 36);
        assert!(matches!(
            expand_rule("_[t.]6[t.]6 => a"),
            Err(Error::Expansion { .. })
        ));
        assert!(matches!(
            expand_rule("_[t.]4[x.]3 => a"),
            Err(Error::Expansion { .. })
        ));
    }

    #[test]
    fn test_stage_names() {
        let names: Vec<&str> = STAGES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.first(), Some(&"normalize"));
        assert_eq!(names.last(), Some(&"pointing"));
    }

    #[test]
    fn test_missing_arrow() {
        assert!(matches!(
            expand_rule("a b"),
            Err(Error::Expansion { .. })
        ));
    }

    #[test]
    fn test_split_rules_text() {
        let rules = split_rules_text("a => b; b => c\n\n  c => a  ;");
        assert_eq!(rules, vec!["a => b", "b => c", "c => a"]);
    }
}
