//! Property tables and `${name}` placeholder resolution.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Upper bound on nested placeholder expansion before a value counts as unresolvable.
const MAX_RESOLUTION_DEPTH: usize = 32;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// A placeholder that could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Name inside `${...}` that failed
    pub placeholder: String,
    /// The raw value that contained it
    pub value: String,
}

/// Merged `name -> raw value` table. Values keep their placeholders; expansion
/// happens on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTable {
    values: HashMap<String, String>,
}

impl PropertyTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set `name` only if it is not already present.
    ///
    /// Used when folding ancestors in from nearest to farthest: the nearer
    /// declaration wins.
    pub fn insert_if_absent(&mut self, name: &str, value: &str) {
        self.values.entry(name.to_string()).or_insert_with(|| value.to_string());
    }

    /// Raw value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Expand every placeholder in `value`, recursively.
    ///
    /// # Errors
    ///
    /// Returns the first placeholder that is undefined, self-referential, or nested
    /// deeper than the expansion bound.
    pub fn resolve(&self, value: &str) -> Result<String, Unresolved> {
        let mut stack = Vec::new();
        self.expand(value, &mut stack).map_err(|placeholder| Unresolved {
            placeholder,
            value: value.to_string(),
        })
    }

    fn expand(&self, value: &str, stack: &mut Vec<String>) -> Result<String, String> {
        let pattern = placeholder_pattern();
        let mut out = String::with_capacity(value.len());
        let mut last = 0;

        for captures in pattern.captures_iter(value) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let name = name.as_str().trim();
            if stack.len() >= MAX_RESOLUTION_DEPTH || stack.iter().any(|seen| seen == name) {
                return Err(name.to_string());
            }
            let raw = self.get(name).ok_or_else(|| name.to_string())?;

            stack.push(name.to_string());
            let expanded = self.expand(raw, stack)?;
            stack.pop();

            out.push_str(&value[last..whole.start()]);
            out.push_str(&expanded);
            last = whole.end();
        }

        out.push_str(&value[last..]);
        Ok(out)
    }
}

impl FromIterator<(String, String)> for PropertyTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// The property name when `value` is exactly one `${name}` placeholder.
#[must_use]
pub fn single_property(value: &str) -> Option<&str> {
    let inner = value.trim().strip_prefix("${")?.strip_suffix('}')?;
    (!inner.is_empty() && !inner.contains(['$', '{', '}'])).then(|| inner.trim())
}
