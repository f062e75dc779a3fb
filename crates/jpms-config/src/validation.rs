//! Flag combination rules.

use std::fmt;
use std::str::FromStr;

use jpms_graph::DiagnosticKind;

use crate::error::{ConfigError, Result};
use crate::options::CompilerOptions;

pub const MIN_RELEASE: u32 = 6;
pub const MAX_RELEASE: u32 = 25;

/// A Java language level. Both `1.8` and `8` spell level 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JavaLevel(u32);

impl JavaLevel {
    pub const LATEST: Self = Self(MAX_RELEASE);

    pub fn new(level: u32) -> Self {
        Self(level)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Level 9 introduced modules.
    pub fn supports_modules(self) -> bool {
        self.0 >= 9
    }
}

impl FromStr for JavaLevel {
    type Err = ();

    fn from_str(value: &str) -> std::result::Result<Self, ()> {
        let digits = match value.strip_prefix("1.") {
            Some(minor) if !minor.is_empty() => minor,
            _ => value,
        };
        digits.parse::<u32>().map(Self).map_err(|_| ())
    }
}

impl fmt::Display for JavaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 9 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn parse_level(field: &'static str, value: &str) -> Result<JavaLevel> {
    value.parse().map_err(|()| ConfigError::InvalidLevel {
        field,
        value: value.to_string(),
    })
}

impl CompilerOptions {
    /// The compliance level in effect: explicit `compliance`, else
    /// `release`, else `source`, else the latest supported level.
    pub fn effective_compliance(&self) -> Result<JavaLevel> {
        if let Some(compliance) = &self.compliance {
            return parse_level("compliance", compliance);
        }
        if let Some(release) = &self.release {
            return parse_level("release", release);
        }
        if let Some(source) = &self.source {
            return parse_level("source", source);
        }
        Ok(JavaLevel::LATEST)
    }

    /// Checks option combinations. Directive syntax is checked separately by
    /// [`CompilerOptions::to_analysis_options`].
    pub fn validate(&self) -> Result<()> {
        if self.source.is_some() && self.release.is_some() {
            return Err(ConfigError::SourceWithRelease);
        }

        if let Some(release) = &self.release {
            let level = release
                .parse::<JavaLevel>()
                .map_err(|()| ConfigError::UnsupportedRelease(release.clone()))?;
            if !(MIN_RELEASE..=MAX_RELEASE).contains(&level.get()) {
                return Err(ConfigError::UnsupportedRelease(release.clone()));
            }
        }
        if let Some(source) = &self.source {
            parse_level("source", source)?;
        }

        if !self.bootclasspath.is_empty() && self.effective_compliance()?.supports_modules() {
            return Err(ConfigError::BootclasspathNotSupported);
        }

        self.parsed_module_version()?;

        for code in self.errors.iter().chain(&self.warnings).chain(&self.ignore) {
            if !DiagnosticKind::WARNING_CODES.contains(&code.as_str()) {
                return Err(ConfigError::UnknownWarning(code.clone()));
            }
        }
        self.severity_policy()?;

        tracing::debug!(
            compliance = %self.effective_compliance()?,
            "compiler options validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn options() -> CompilerOptions {
        CompilerOptions::default()
    }

    #[test]
    fn levels_accept_both_spellings() {
        assert_eq!("1.8".parse::<JavaLevel>(), Ok(JavaLevel::new(8)));
        assert_eq!("11".parse::<JavaLevel>(), Ok(JavaLevel::new(11)));
        assert!("1.".parse::<JavaLevel>().is_err());
        assert!("eleven".parse::<JavaLevel>().is_err());
        assert_eq!(JavaLevel::new(8).to_string(), "1.8");
        assert_eq!(JavaLevel::new(17).to_string(), "17");
    }

    #[test]
    fn source_and_release_are_exclusive() {
        let err = CompilerOptions {
            source: Some("11".to_string()),
            release: Some("11".to_string()),
            ..options()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "option -source is not supported when --release is used"
        );
    }

    #[test]
    fn release_range() {
        for ok in ["6", "1.8", "9", "25"] {
            let opts = CompilerOptions {
                release: Some(ok.to_string()),
                ..options()
            };
            assert!(opts.validate().is_ok(), "release {ok}");
        }
        for bad in ["5", "26", "x"] {
            let opts = CompilerOptions {
                release: Some(bad.to_string()),
                ..options()
            };
            assert!(
                matches!(opts.validate(), Err(ConfigError::UnsupportedRelease(v)) if v == bad),
                "release {bad}"
            );
        }
    }

    #[test]
    fn bootclasspath_only_below_nine() {
        let boot = vec![PathBuf::from("rt.jar")];
        let modern = CompilerOptions {
            bootclasspath: boot.clone(),
            compliance: Some("9".to_string()),
            ..options()
        };
        assert_eq!(
            modern.validate().unwrap_err().to_string(),
            "option -bootclasspath not supported at compliance level 9 and above"
        );

        let legacy = CompilerOptions {
            bootclasspath: boot.clone(),
            source: Some("1.8".to_string()),
            ..options()
        };
        assert!(legacy.validate().is_ok());

        let defaulted = CompilerOptions {
            bootclasspath: boot,
            ..options()
        };
        assert!(defaulted.validate().is_err(), "latest level has modules");
    }

    #[test]
    fn unknown_and_error_codes_are_rejected() {
        let unknown = CompilerOptions {
            ignore: vec!["no-such-warning".to_string()],
            ..options()
        };
        assert!(matches!(
            unknown.validate(),
            Err(ConfigError::UnknownWarning(code)) if code == "no-such-warning"
        ));

        let error_kind = CompilerOptions {
            ignore: vec!["package-conflict".to_string()],
            ..options()
        };
        assert!(error_kind.validate().is_err(), "errors cannot be overridden");
    }

    #[test]
    fn invalid_module_version() {
        let opts = CompilerOptions {
            module_version: Some("".to_string()),
            ..options()
        };
        assert_eq!(
            opts.validate().unwrap_err().to_string(),
            "invalid module version ''"
        );
    }
}
