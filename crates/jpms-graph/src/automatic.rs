//! Naming of automatic modules (plain JARs placed on the module path).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::declaration::JarInfo;
use crate::error::{GraphError, Result};
use crate::name::ModuleName;

/// `-` followed by a digit starts the version part of a JAR file name.
static VERSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-(\d+(\.|$))").expect("valid regex"));
static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid regex"));
static REPEATED_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").expect("valid regex"));

/// How the name of an automatic module was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutomaticNameSource {
    /// `Automatic-Module-Name` in the JAR manifest: stable.
    Manifest,
    /// Derived from the file name: may change between releases.
    FileName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedName {
    pub name: ModuleName,
    pub version: Option<String>,
    pub source: AutomaticNameSource,
}

/// Names an automatic module, preferring the manifest attribute.
pub fn automatic_module_name(jar: &JarInfo) -> Result<DerivedName> {
    if let Some(manifest) = &jar.manifest_name {
        let name = ModuleName::new(manifest).map_err(|_| GraphError::AutomaticModuleName {
            file: jar.file_name.clone(),
            reason: format!("Automatic-Module-Name: {manifest} is not a legal module name"),
        })?;
        let version = derive_from_file_name(&jar.file_name).1;
        return Ok(DerivedName {
            name,
            version,
            source: AutomaticNameSource::Manifest,
        });
    }

    let (candidate, version) = derive_from_file_name(&jar.file_name);
    let name = ModuleName::new(&candidate).map_err(|_| GraphError::AutomaticModuleName {
        file: jar.file_name.clone(),
        reason: format!("{candidate}: Invalid module name"),
    })?;
    Ok(DerivedName {
        name,
        version,
        source: AutomaticNameSource::FileName,
    })
}

/// Strips `.jar` and the version suffix, then normalizes separators to dots.
fn derive_from_file_name(file_name: &str) -> (String, Option<String>) {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let base = base.strip_suffix(".jar").unwrap_or(base);

    let (stem, version) = match VERSION_SUFFIX.find(base) {
        Some(m) => (&base[..m.start()], Some(base[m.start() + 1..].to_string())),
        None => (base, None),
    };

    let dotted = NON_ALPHANUMERIC.replace_all(stem, ".");
    let collapsed = REPEATED_DOTS.replace_all(&dotted, ".");
    (collapsed.trim_matches('.').to_string(), version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar(file: &str) -> JarInfo {
        JarInfo {
            file_name: file.to_string(),
            manifest_name: None,
        }
    }

    #[test]
    fn derives_name_from_plain_file_name() {
        let derived = automatic_module_name(&jar("lib1.jar")).unwrap();
        assert_eq!(derived.name.as_str(), "lib1");
        assert_eq!(derived.version, None);
        assert_eq!(derived.source, AutomaticNameSource::FileName);
    }

    #[test]
    fn strips_version_and_normalizes_separators() {
        let derived = automatic_module_name(&jar("libs/foo-bar_baz-1.2.3.jar")).unwrap();
        assert_eq!(derived.name.as_str(), "foo.bar.baz");
        assert_eq!(derived.version.as_deref(), Some("1.2.3"));

        let derived = automatic_module_name(&jar("--weird..name--.jar")).unwrap();
        assert_eq!(derived.name.as_str(), "weird.name");
    }

    #[test]
    fn manifest_name_wins() {
        let info = JarInfo {
            file_name: "lib-2.0.jar".to_string(),
            manifest_name: Some("org.lib".to_string()),
        };
        let derived = automatic_module_name(&info).unwrap();
        assert_eq!(derived.name.as_str(), "org.lib");
        assert_eq!(derived.version.as_deref(), Some("2.0"));
        assert_eq!(derived.source, AutomaticNameSource::Manifest);
    }

    #[test]
    fn underivable_names_are_fatal() {
        let err = automatic_module_name(&jar("1234.jar")).unwrap_err();
        assert!(matches!(err, GraphError::AutomaticModuleName { .. }));

        let err = automatic_module_name(&jar("foo.class.jar")).unwrap_err();
        assert!(err.to_string().contains("foo.class.jar"));
    }
}
