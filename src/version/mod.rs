//! Maven version ordering.
//!
//! Descriptor version strings are looser than semantic versioning: `2.7.RELEASE`,
//! `31.1-jre`, `1.0-rc1`, `5.3.0.M2` and `1.0.0-SNAPSHOT` all occur in practice. A
//! [`MavenVersion`] is therefore a list of tagged segments rather than a
//! major/minor/patch triple.
//!
//! # Tokenizing
//!
//! The string is split on `.`, `-` and `_`, and additionally wherever a digit meets
//! a letter (`rc1` becomes `rc`, `1`). Each token is either a numeric segment or a
//! qualifier.
//!
//! # Ordering
//!
//! Segments are compared pairwise from the left:
//!
//! - numeric vs numeric: by value, so `1.2.0 < 1.10.0`
//! - numeric vs qualifier: the number is greater (`1.0.1 > 1.0-rc`)
//! - qualifier vs qualifier: by rank
//!   `alpha < beta < milestone < rc < snapshot < (other) < release < sp`, then
//!   lexically for two unknown qualifiers
//! - a missing segment sorts below a numeric one (`1.0 < 1.0.1`) and behaves as
//!   `release` against a qualifier (`1.0.0-SNAPSHOT < 1.0.0`, `1.0 < 1.0-sp1`)
//!
//! `ga`, `final` and `release` are release-equivalent, so `2.7.RELEASE == 2.7`.
//!
//! # Examples
//!
//! ```rust
//! use pomup_cli::version::MavenVersion;
//!
//! let a = MavenVersion::parse("1.2.0");
//! let b = MavenVersion::parse("1.10.0");
//! assert!(a < b);
//!
//! assert!(MavenVersion::parse("1.0.0-SNAPSHOT") < MavenVersion::parse("1.0.0"));
//! assert!(MavenVersion::parse("1.0") < MavenVersion::parse("1.0.1"));
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A parsed version string that keeps its original spelling for display.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    original: String,
    segments: Vec<Segment>,
}

/// One tagged piece of a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of digits
    Number(u64),
    /// A run of letters, lowercased
    Qualifier(Qualifier),
}

/// Qualifier ranks from least to most mature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    ReleaseCandidate,
    Snapshot,
    /// Unrecognized qualifiers, ordered lexically among themselves
    Other(String),
    Release,
    ServicePack,
}

impl Qualifier {
    fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "alpha" | "a" => Self::Alpha,
            "beta" | "b" => Self::Beta,
            "milestone" | "m" => Self::Milestone,
            "rc" | "cr" => Self::ReleaseCandidate,
            "snapshot" => Self::Snapshot,
            "" | "ga" | "final" | "release" => Self::Release,
            "sp" => Self::ServicePack,
            other => Self::Other(other.to_string()),
        }
    }
}

impl MavenVersion {
    /// Parse a version string. Parsing never fails; any text is some version.
    #[must_use]
    pub fn parse(version: &str) -> Self {
        let original = version.trim().to_string();
        let segments = tokenize(&original);
        Self {
            original,
            segments,
        }
    }

    /// The version as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Tagged segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

fn tokenize(version: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut token = String::new();
    let mut token_is_digit = false;

    let flush = |token: &mut String, segments: &mut Vec<Segment>, is_digit: bool| {
        if token.is_empty() {
            return;
        }
        let segment = if is_digit {
            match token.parse::<u64>() {
                Ok(number) => Segment::Number(number),
                Err(_) => Segment::Qualifier(Qualifier::Other(token.clone())),
            }
        } else {
            Segment::Qualifier(Qualifier::from_token(token))
        };
        segments.push(segment);
        token.clear();
    };

    for c in version.chars() {
        if matches!(c, '.' | '-' | '_') {
            flush(&mut token, &mut segments, token_is_digit);
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if !token.is_empty() && is_digit != token_is_digit {
            flush(&mut token, &mut segments, token_is_digit);
        }
        token_is_digit = is_digit;
        token.push(c);
    }
    flush(&mut token, &mut segments, token_is_digit);

    // Trailing release markers carry no ordering information.
    while matches!(segments.last(), Some(Segment::Qualifier(Qualifier::Release))) {
        segments.pop();
    }
    segments
}

fn compare_segments(left: Option<&Segment>, right: Option<&Segment>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (Some(Segment::Number(a)), Some(Segment::Number(b))) => a.cmp(b),
        (Some(Segment::Number(_)), Some(Segment::Qualifier(_))) => Ordering::Greater,
        (Some(Segment::Qualifier(_)), Some(Segment::Number(_))) => Ordering::Less,
        (Some(Segment::Qualifier(a)), Some(Segment::Qualifier(b))) => a.cmp(b),
        (None, Some(Segment::Number(_))) => Ordering::Less,
        (Some(Segment::Number(_)), None) => Ordering::Greater,
        (None, Some(Segment::Qualifier(q))) => Qualifier::Release.cmp(q),
        (Some(Segment::Qualifier(q)), None) => q.cmp(&Qualifier::Release),
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for index in 0..len {
            let ordering = compare_segments(self.segments.get(index), other.segments.get(index));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Compare two version strings with Maven ordering.
#[must_use]
pub fn compare(left: &str, right: &str) -> Ordering {
    MavenVersion::parse(left).cmp(&MavenVersion::parse(right))
}
