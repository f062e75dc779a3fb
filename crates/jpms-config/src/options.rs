//! The option set of one compilation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use jpms_graph::{
    AddReads, AnalysisOptions, GraphError, Level, ModuleName, ModuleVersion, PackageGrant,
    SeverityPolicy,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, Result};

/// Module-related compiler options, as read from `jpms.toml`.
///
/// Directive values are kept as the raw option strings so a file and the
/// command line spell them the same way; they are parsed by
/// [`CompilerOptions::to_analysis_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompilerOptions {
    /// `--add-reads SOURCE=TARGET(,TARGET)*`
    #[serde(default)]
    pub add_reads: Vec<String>,

    /// `--add-exports MODULE/PACKAGE=TARGET(,TARGET)*`
    #[serde(default)]
    pub add_exports: Vec<String>,

    /// `--add-opens MODULE/PACKAGE=TARGET(,TARGET)*`
    #[serde(default)]
    pub add_opens: Vec<String>,

    /// Root modules for `--limit-modules`; entries may be comma separated.
    #[serde(default)]
    pub limit_modules: Vec<String>,

    #[serde(
        default,
        deserialize_with = "level_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub release: Option<String>,

    #[serde(
        default,
        deserialize_with = "level_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,

    #[serde(
        default,
        deserialize_with = "level_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub compliance: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bootclasspath: Vec<PathBuf>,

    /// `--module-version` of the modules being compiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_version: Option<String>,

    #[serde(default)]
    pub warnings_as_errors: bool,

    /// Warning codes promoted to errors.
    #[serde(default)]
    pub errors: Vec<String>,

    /// Warning codes kept as warnings even with `warnings-as-errors`.
    #[serde(default)]
    pub warnings: Vec<String>,

    /// Warning codes that are not reported.
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// Values given on the command line. Unset fields leave the lower-priority
/// sources untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_reads: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_exports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_opens: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub limit_modules: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings_as_errors: Option<bool>,
}

/// Levels arrive as strings from TOML (`"1.8"`) but as numbers from bare
/// TOML values and from the environment (`JPMS_RELEASE=17`).
fn level_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    }))
}

impl CompilerOptions {
    /// The options as `jpms.toml` content.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Example `jpms.toml` content.
    pub fn example_config() -> Result<String> {
        Self {
            add_reads: vec!["com.example.app=ALL-UNNAMED".to_string()],
            add_exports: vec![
                "com.example.core/com.example.core.internal=com.example.app".to_string(),
            ],
            release: Some("21".to_string()),
            module_version: Some("1.0".to_string()),
            errors: vec!["api-leak".to_string()],
            ..Self::default()
        }
        .to_toml()
    }

    /// Parsed `--module-version`, if one was given.
    pub fn parsed_module_version(&self) -> Result<Option<ModuleVersion>> {
        self.module_version
            .as_deref()
            .map(|value| {
                ModuleVersion::parse(value).map_err(|source| ConfigError::InvalidModuleVersion {
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Root module names of `--limit-modules`, split on commas.
    pub fn limit_module_names(&self) -> Result<Vec<ModuleName>> {
        self.limit_modules
            .iter()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| ModuleName::new(name).map_err(|e| GraphError::from(e).into()))
            .collect()
    }

    /// The severity policy described by `warnings-as-errors` and the
    /// `errors`/`warnings`/`ignore` lists.
    pub fn severity_policy(&self) -> Result<SeverityPolicy> {
        let mut overrides = BTreeMap::new();
        let groups = [
            (&self.errors, Level::Error),
            (&self.warnings, Level::Warning),
            (&self.ignore, Level::Ignore),
        ];
        for (codes, level) in groups {
            for code in codes {
                if overrides.insert(code.clone(), level).is_some_and(|prev| prev != level) {
                    return Err(ConfigError::ConflictingSeverity(code.clone()));
                }
            }
        }
        Ok(SeverityPolicy {
            warnings_as_errors: self.warnings_as_errors,
            overrides,
        })
    }

    /// Parses every directive. A syntax error or an invalid module name in
    /// any of them is fatal.
    pub fn to_analysis_options(&self) -> Result<AnalysisOptions> {
        let add_reads = self
            .add_reads
            .iter()
            .map(|value| AddReads::parse(value))
            .collect::<jpms_graph::Result<Vec<_>>>()?;

        let exports = self.add_exports.iter().map(|v| PackageGrant::parse_exports(v));
        let opens = self.add_opens.iter().map(|v| PackageGrant::parse_opens(v));
        let grants = exports
            .chain(opens)
            .collect::<jpms_graph::Result<Vec<_>>>()?;

        Ok(AnalysisOptions {
            add_reads,
            grants,
            limit_modules: self.limit_module_names()?,
            policy: self.severity_policy()?,
        })
    }
}
