//! Validated names for modules, packages and types.
//!
//! All three are dotted sequences of Java identifiers. Names are cheap to
//! clone (`Arc<str>`) because they are stored in several indexes at once.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved words that can never appear as a name segment.
const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null", "_",
];

/// Error raised when a string is not a valid dotted name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("invalid module name: {0}")]
    InvalidModuleName(String),

    #[error("invalid package name: {0}")]
    InvalidPackageName(String),

    #[error("invalid type name: {0}")]
    InvalidTypeName(String),
}

/// Returns true if `segment` is a legal Java identifier that is not a keyword.
pub fn is_java_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return false;
    }
    !KEYWORDS.contains(&segment)
}

fn is_dotted_name(value: &str) -> bool {
    !value.is_empty() && value.split('.').all(is_java_identifier)
}

/// Name of a named module, e.g. `mod.one` or `java.base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(Arc<str>);

/// The module every other module implicitly requires.
pub const JAVA_BASE: &str = "java.base";

/// Option value denoting the unnamed module. Doubles as its internal name;
/// it can never collide with a declared module since `-` is not legal in one.
pub const ALL_UNNAMED: &str = "ALL-UNNAMED";

impl ModuleName {
    pub fn new(value: impl AsRef<str>) -> Result<Self, NameError> {
        let value = value.as_ref();
        if is_dotted_name(value) {
            Ok(Self(Arc::from(value)))
        } else {
            Err(NameError::InvalidModuleName(value.to_string()))
        }
    }

    pub fn java_base() -> Self {
        Self(Arc::from(JAVA_BASE))
    }

    pub fn unnamed() -> Self {
        Self(Arc::from(ALL_UNNAMED))
    }

    pub fn is_unnamed(&self) -> bool {
        &*self.0 == ALL_UNNAMED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_java_base(&self) -> bool {
        &*self.0 == JAVA_BASE
    }
}

/// Name of a package. The empty name denotes the unnamed package, which
/// only classpath compilation units may use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(Arc<str>);

impl PackageName {
    pub fn new(value: impl AsRef<str>) -> Result<Self, NameError> {
        let value = value.as_ref();
        if value.is_empty() || is_dotted_name(value) {
            Ok(Self(Arc::from(value)))
        } else {
            Err(NameError::InvalidPackageName(value.to_string()))
        }
    }

    pub fn unnamed() -> Self {
        Self(Arc::from(""))
    }

    pub fn is_unnamed(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PackageName {
    fn default() -> Self {
        Self::unnamed()
    }
}

/// Fully qualified name of a top-level type, e.g. `p.q.Api`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName {
    qualified: Arc<str>,
    #[serde(skip)]
    split: usize,
}

impl TypeName {
    pub fn new(value: impl AsRef<str>) -> Result<Self, NameError> {
        let value = value.as_ref();
        if !is_dotted_name(value) {
            return Err(NameError::InvalidTypeName(value.to_string()));
        }
        let split = value.rfind('.').map_or(0, |idx| idx + 1);
        Ok(Self {
            qualified: Arc::from(value),
            split,
        })
    }

    /// Builds `package.simple`.
    pub fn in_package(package: &PackageName, simple: &str) -> Result<Self, NameError> {
        if package.is_unnamed() {
            Self::new(simple)
        } else {
            Self::new(format!("{}.{}", package.as_str(), simple))
        }
    }

    /// Package part of the name (everything before the last dot).
    pub fn package(&self) -> PackageName {
        if self.split == 0 {
            PackageName::unnamed()
        } else {
            PackageName(Arc::from(&self.qualified[..self.split - 1]))
        }
    }

    pub fn simple_name(&self) -> &str {
        &self.qualified[self.split..]
    }

    pub fn as_str(&self) -> &str {
        &self.qualified
    }
}

macro_rules! string_conversions {
    ($ty:ident) => {
        impl TryFrom<String> for $ty {
            type Error = NameError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = NameError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = NameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

string_conversions!(ModuleName);
string_conversions!(PackageName);
string_conversions!(TypeName);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_names_are_dotted_identifiers() {
        assert!(ModuleName::new("mod.one").is_ok());
        assert!(ModuleName::new("java.base").is_ok());
        assert!(ModuleName::new("lib1").is_ok());
        assert!(ModuleName::new("").is_err());
        assert!(ModuleName::new("mod..one").is_err());
        assert!(ModuleName::new("mod.one.").is_err());
        assert!(ModuleName::new("1mod").is_err());
        assert!(ModuleName::new("mod-one").is_err());
    }

    #[test]
    fn keywords_are_rejected() {
        assert!(ModuleName::new("mod.class").is_err());
        assert!(PackageName::new("p.int").is_err());
        assert_eq!(
            ModuleName::new("public").unwrap_err().to_string(),
            "invalid module name: public"
        );
    }

    #[test]
    fn empty_package_is_unnamed() {
        let pkg = PackageName::new("").unwrap();
        assert!(pkg.is_unnamed());
        assert!(!PackageName::new("p").unwrap().is_unnamed());
    }

    #[test]
    fn type_name_splits_package_and_simple_name() {
        let ty = TypeName::new("p.q.Api").unwrap();
        assert_eq!(ty.package().as_str(), "p.q");
        assert_eq!(ty.simple_name(), "Api");

        let top = TypeName::new("Main").unwrap();
        assert!(top.package().is_unnamed());
        assert_eq!(top.simple_name(), "Main");
    }

    #[test]
    fn type_name_from_package() {
        let pkg = PackageName::new("p").unwrap();
        assert_eq!(TypeName::in_package(&pkg, "X").unwrap().as_str(), "p.X");
        assert_eq!(
            TypeName::in_package(&PackageName::unnamed(), "X").unwrap().as_str(),
            "X"
        );
    }

    #[test]
    fn names_round_trip_through_serde() {
        let name: ModuleName = serde_json::from_str("\"mod.two\"").unwrap();
        assert_eq!(name.as_str(), "mod.two");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"mod.two\"");
        assert!(serde_json::from_str::<ModuleName>("\"mod two\"").is_err());

        let ty: TypeName = serde_json::from_str("\"p.X\"").unwrap();
        assert_eq!(ty.simple_name(), "X");
    }
}
