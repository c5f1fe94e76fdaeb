//! Named presets and life-like totalistic rules
//!
//! A preset replaces a whole authored entry with a rule list. Keys are
//! matched case-insensitively and the `/` is optional, so `B3/S23` and
//! `b3s23` name the same preset.
//!
//! Any other `B<digits>/S<digits>` key compiles to explicit rules over the
//! live state `a` and the empty state `_`, counting the six neighbors.

/// Conway-style hex life: birth on 3, survive on 2 or 3
const CONWAY_B3S23: &[&str] = &[
    "_[a]3[_]3 => a",
    "a[a]2[a|_][_]3 => a",
    "a[_|a][_]5 | a[a]4[_|a][_|a] => _",
];

/// Hand-written presets, checked before the generic life-like compiler
const NAMED_PRESETS: &[(&str, &[&str])] = &[("B3/S23", CONWAY_B3S23)];

/// Demonstration rule sets shown by the front ends
pub const EXAMPLE_RULE_SETS: &[(&str, &[&str])] = &[
    ("Simple Cycle", &["a => b", "b => c", "c => a"]),
    ("Conditional Growth", &["a[b] => c", "c => b"]),
    (
        "Directional Movement",
        &[
            "t1 => t2", "t2 => t3", "t3 => t4", "t4 => t5", "t5 => t6", "t6 => t1",
        ],
    ),
    (
        "Complex Interaction",
        &["a[x] => b", "b => y", "x => a", "y => x"],
    ),
    ("Pointing Growth", &["_[t.] => a", "t% => t%1"]),
];

fn normalize_key(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| *c != '/')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Look up a preset by key, returning its rules
pub fn expand_preset(text: &str) -> Option<Vec<String>> {
    let key = normalize_key(text);
    NAMED_PRESETS
        .iter()
        .find(|(name, _)| normalize_key(name) == key)
        .map(|(_, rules)| rules.iter().map(|r| r.to_string()).collect())
        .or_else(|| life_like(&key))
}

/// Parse digits 0..=6 into a neighbor-count set
fn counts(digits: &str) -> Option<[bool; 7]> {
    let mut set = [false; 7];
    for c in digits.chars() {
        let n = c.to_digit(10).filter(|n| *n <= 6)?;
        set[n as usize] = true;
    }
    Some(set)
}

/// Canonical rule requiring exactly `live` neighbors in state `a`
fn totalistic(source: char, live: usize, target: char) -> String {
    format!("{source}{}{} => {target}", "[a]".repeat(live), "[_]".repeat(6 - live))
}

/// Compile a normalized `B<digits>S<digits>` key
fn life_like(key: &str) -> Option<Vec<String>> {
    let (birth, survive) = key.strip_prefix('B')?.split_once('S')?;
    let birth = counts(birth)?;
    let survive = counts(survive)?;

    let births = (0..=6)
        .filter(|&n| birth[n])
        .map(|n| totalistic('_', n, 'a'));
    let survivals = (0..=6)
        .filter(|&n| survive[n])
        .map(|n| totalistic('a', n, 'a'));
    let deaths = (0..=6)
        .filter(|&n| !survive[n])
        .map(|n| totalistic('a', n, '_'));

    Some(births.chain(survivals).chain(deaths).collect())
}
