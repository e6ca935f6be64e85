use std::collections::BTreeSet;
use std::fmt;

use crate::assemble::JibConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    UnknownProfile(String),
    UnknownDependency { profile: String, dependency: String },
    MissingRevision(String),
    MissingOrganization(String),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProfile(p) => write!(f, "unknown profile '{p}'"),
            Self::UnknownDependency {
                profile,
                dependency,
            } => write!(
                f,
                "profile '{profile}' depends on undefined dependency '{dependency}'"
            ),
            Self::MissingRevision(d) => {
                write!(f, "dependency '{d}' has no revision for this platform")
            }
            Self::MissingOrganization(d) => write!(f, "dependency '{d}' has no organization"),
        }
    }
}

/// Collects every issue. Dependency completeness is checked for the
/// dependencies of `active`, or of all profiles when none is active.
pub fn check(config: &JibConfig, active: Option<&str>) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(name) = active {
        if !config.profiles.contains_key(name) {
            issues.push(Issue::UnknownProfile(name.to_string()));
        }
    }

    for (name, profile) in &config.profiles {
        for dep in &profile.dependencies {
            if !config.dependencies.contains_key(dep) {
                issues.push(Issue::UnknownDependency {
                    profile: name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    let used: BTreeSet<&str> = config
        .profiles
        .iter()
        .filter(|(name, _)| active.is_none_or(|a| a == name.as_str()))
        .flat_map(|(_, p)| p.dependencies.iter().map(String::as_str))
        .collect();
    for name in used {
        let Some(dep) = config.dependencies.get(name) else {
            continue;
        };
        if dep.revision().is_none_or(str::is_empty) {
            issues.push(Issue::MissingRevision(name.to_string()));
        }
        if dep.organization().is_some_and(str::is_empty) {
            issues.push(Issue::MissingOrganization(name.to_string()));
        }
    }

    issues
}

pub fn validate(config: &JibConfig, active: Option<&str>) -> Result<()> {
    let issues = check(config, active);
    if issues.is_empty() {
        return Ok(());
    }
    let lines: Vec<String> = issues.iter().map(ToString::to_string).collect();
    Err(Error::msg(format!(
        "configuration is not usable:\n  {}",
        lines.join("\n  ")
    )))
}
