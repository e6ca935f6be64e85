use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use toml::Value;
use toml::value::Table;

use crate::common::Common;
use crate::error::{Error, Result};
use crate::input::Input;
use crate::tree;

pub mod catalog;
pub mod normalize;
pub mod variants;

pub use catalog::ProfileCatalog;
pub use normalize::DEFAULT_MAKE_TARGET_ARG;

pub type ProfileMap = BTreeMap<String, DeclaredProfile>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    Fastdebug,
    Slowdebug,
}

impl DebugLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fastdebug => "fastdebug",
            Self::Slowdebug => "slowdebug",
        }
    }
}

/// A profile as written in the catalog. Build host fields may be left out
/// and are filled in from the target when the profile is completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclaredProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_cpu: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configure_args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_make_targets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_level: Option<DebugLevel>,
}

impl DeclaredProfile {
    pub fn target(os: impl Into<String>, cpu: impl Into<String>) -> Self {
        Self {
            target_os: Some(os.into()),
            target_cpu: Some(cpu.into()),
            ..Default::default()
        }
    }
}

/// A completed profile; every platform field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub target_os: String,
    pub target_cpu: String,
    pub target_platform: String,
    pub build_os: String,
    pub build_cpu: String,
    pub build_platform: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configure_args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_make_targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_level: Option<DebugLevel>,
}

fn to_table(profiles: &ProfileMap) -> Result<Table> {
    match Value::try_from(profiles)? {
        Value::Table(t) => Ok(t),
        other => Err(Error::msg(format!(
            "profile map serialized to {} instead of a table",
            other.type_str()
        ))),
    }
}

/// Merges two profile maps with [`tree::concat`] semantics: list fields of
/// a profile present in both maps are appended, single-valued fields may
/// only be set on one side.
pub fn merge_profiles(a: &ProfileMap, b: &ProfileMap) -> Result<ProfileMap> {
    let merged = tree::concat_tables(&to_table(a)?, &to_table(b)?)?;
    Value::Table(merged)
        .try_into()
        .map_err(|e| Error::msg(format!("profiles do not merge cleanly: {e}")))
}

/// Builds the complete profile set for `input` from the built-in catalog.
pub fn build_profiles(input: &Input, common: &Common) -> Result<BTreeMap<String, Profile>> {
    build_profiles_from(&ProfileCatalog::builtin(input, common), common)
}

pub fn build_profiles_from(
    catalog: &ProfileCatalog,
    common: &Common,
) -> Result<BTreeMap<String, Profile>> {
    let mut profiles = merge_profiles(&ProfileMap::new(), &catalog.main)?;
    profiles = merge_profiles(&profiles, &variants::debug_profiles(common, &catalog.main))?;
    profiles = merge_profiles(&profiles, &variants::slowdebug_profiles(common, &catalog.main))?;

    // Open variants come from the main profiles only; the extras append to
    // whatever the open variant inherited.
    let open = merge_profiles(&variants::open_profiles(&catalog.main), &catalog.open_extras)?;
    profiles = merge_profiles(&profiles, &open)?;
    profiles = merge_profiles(&profiles, &variants::debug_profiles(common, &open))?;

    profiles = merge_profiles(&profiles, &catalog.test)?;
    tracing::debug!(count = profiles.len(), "declared profiles");

    let completed = normalize::complete_platforms(profiles)?;
    Ok(normalize::rewrite_default_make_targets(completed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, DeclaredProfile)>) -> ProfileMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn merge_appends_list_fields() {
        let a = map(vec![(
            "p",
            DeclaredProfile {
                configure_args: vec!["--a".into()],
                ..DeclaredProfile::target("linux", "x64")
            },
        )]);
        let b = map(vec![(
            "p",
            DeclaredProfile {
                configure_args: vec!["--b".into()],
                labels: vec!["extra".into()],
                ..Default::default()
            },
        )]);
        let got = merge_profiles(&a, &b).unwrap();
        let p = &got["p"];
        assert_eq!(p.target_os.as_deref(), Some("linux"));
        assert_eq!(p.configure_args, ["--a", "--b"]);
        assert_eq!(p.labels, ["extra"]);
    }

    #[test]
    fn merge_keeps_disjoint_profiles() {
        let a = map(vec![("a", DeclaredProfile::target("linux", "x64"))]);
        let b = map(vec![("b", DeclaredProfile::target("windows", "x86"))]);
        let got = merge_profiles(&a, &b).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got["a"], a["a"]);
        assert_eq!(got["b"], b["b"]);
    }

    #[test]
    fn merge_rejects_a_scalar_set_twice() {
        let a = map(vec![("p", DeclaredProfile::target("linux", "x64"))]);
        let b = map(vec![("p", DeclaredProfile::target("linux", "x64"))]);
        let err = merge_profiles(&a, &b).unwrap_err().to_string();
        assert!(err.contains("do not merge cleanly"), "{err}");
    }

    #[test]
    fn merge_into_empty_is_a_copy() {
        let a = map(vec![(
            "p",
            DeclaredProfile {
                debug_level: Some(DebugLevel::Slowdebug),
                ..DeclaredProfile::target("solaris", "sparcv9")
            },
        )]);
        assert_eq!(merge_profiles(&ProfileMap::new(), &a).unwrap(), a);
    }

    #[test]
    fn open_extras_append_to_inherited_targets() {
        let input = Input::new("linux", "x64", "linux", "x64");
        let common = Common::new(&input);
        let profiles = build_profiles(&input, &common).unwrap();
        assert_eq!(
            profiles["linux-x64-open"].default_make_targets,
            ["product-images", "test-image", "docs-image", "profiles"]
        );
        assert_eq!(
            profiles["linux-x86-open"].default_make_targets,
            ["product-images", "test-image", "profiles"]
        );
        assert_eq!(
            profiles["macosx-x64-open"].default_make_targets,
            ["product-images", "test-image"]
        );
    }

    #[test]
    fn profile_count_covers_every_variant() {
        let input = Input::new("linux", "x64", "linux", "x64");
        let common = Common::new(&input);
        let profiles = build_profiles(&input, &common).unwrap();
        // main, debug, slowdebug, open, open-debug, plus run-test
        assert_eq!(profiles.len(), 7 * 5 + 1);
        assert!(profiles.contains_key("windows-x86-open-debug"));
        assert!(profiles.contains_key("solaris-sparcv9-slowdebug"));
        assert!(!profiles.contains_key("linux-x64-debug-open"));
        assert!(!profiles.contains_key("linux-x64-slowdebug-debug"));
    }

    #[test]
    fn unknown_open_extra_fails_completion() {
        let input = Input::new("linux", "x64", "linux", "x64");
        let common = Common::new(&input);
        let mut catalog = ProfileCatalog::builtin(&input, &common);
        catalog.open_extras.insert(
            "aix-ppc64-open".into(),
            DeclaredProfile {
                default_make_targets: vec!["profiles".into()],
                ..Default::default()
            },
        );
        let err = build_profiles_from(&catalog, &common).unwrap_err().to_string();
        assert!(err.contains("aix-ppc64-open"), "{err}");
    }
}
