//! Module version strings (`--module-version`, `requires` compiled versions).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Empty version string")]
    Empty,

    #[error("{0}: Version string does not start with a number")]
    NoLeadingNumber(String),

    #[error("{0}: Empty pre-release or build component")]
    EmptyComponent(String),

    #[error("{0}: Version string contains whitespace")]
    Whitespace(String),
}

/// A parsed module version: a dotted numeric sequence, an optional
/// `-pre` part and an optional `+build` part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleVersion {
    raw: String,
    sequence: Vec<u64>,
    pre: Option<String>,
    build: Option<String>,
}

impl ModuleVersion {
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        if raw.is_empty() {
            return Err(VersionError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(VersionError::Whitespace(raw.to_string()));
        }
        if !raw.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(VersionError::NoLeadingNumber(raw.to_string()));
        }

        let seq_end = raw.find(['-', '+']).unwrap_or(raw.len());
        let mut sequence = Vec::new();
        for part in raw[..seq_end].split('.') {
            // `1.0.RC1`: the sequence ends at the first non-numeric segment.
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                break;
            }
            sequence.push(digits.parse().unwrap_or(u64::MAX));
        }

        let rest = &raw[seq_end..];
        let (pre, build) = match rest.split_once('+') {
            Some((pre, build)) => (pre, Some(build)),
            None => (rest, None),
        };
        let pre = match pre.strip_prefix('-') {
            Some("") => return Err(VersionError::EmptyComponent(raw.to_string())),
            Some(pre) => Some(pre.to_string()),
            None => None,
        };
        let build = match build {
            Some("") => return Err(VersionError::EmptyComponent(raw.to_string())),
            Some(build) => Some(build.to_string()),
            None => None,
        };

        Ok(Self {
            raw: raw.to_string(),
            sequence,
            pre,
            build,
        })
    }

    pub fn sequence(&self) -> &[u64] {
        &self.sequence
    }

    pub fn pre_release(&self) -> Option<&str> {
        self.pre.as_deref()
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialOrd for ModuleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.sequence.len().max(other.sequence.len());
        for idx in 0..len {
            let a = self.sequence.get(idx).copied().unwrap_or(0);
            let b = other.sequence.get(idx).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        // A pre-release sorts before the plain version.
        let qualifiers = match (&self.pre, &other.pre) {
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (a, b) => a.cmp(b).then_with(|| self.build.cmp(&other.build)),
        };
        // Versions equal in every parsed part, such as `1.0` and `1`, or
        // `1.0.RC1` and `1.0`, still differ in their text.
        qualifiers.then_with(|| self.raw.cmp(&other.raw))
    }
}

impl TryFrom<String> for ModuleVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ModuleVersion> for String {
    fn from(value: ModuleVersion) -> Self {
        value.raw
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
