use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::{DeclaredProfile, Profile, ProfileMap};

/// Configure option carrying a profile's default make targets.
pub const DEFAULT_MAKE_TARGET_ARG: &str = "--with-default-make-target";

impl DeclaredProfile {
    /// Fills the build host from the target where it is not set and derives
    /// both platform strings.
    pub fn complete(self, name: &str) -> Result<Profile> {
        let missing = |field: &str| Error::msg(format!("profile '{name}' has no {field}"));
        let target_os = self.target_os.ok_or_else(|| missing("target_os"))?;
        let target_cpu = self.target_cpu.ok_or_else(|| missing("target_cpu"))?;
        let build_os = self.build_os.unwrap_or_else(|| target_os.clone());
        let build_cpu = self.build_cpu.unwrap_or_else(|| target_cpu.clone());

        Ok(Profile {
            target_platform: format!("{target_os}_{target_cpu}"),
            build_platform: format!("{build_os}_{build_cpu}"),
            target_os,
            target_cpu,
            build_os,
            build_cpu,
            dependencies: self.dependencies,
            configure_args: self.configure_args,
            labels: self.labels,
            default_make_targets: self.default_make_targets,
            debug_level: self.debug_level,
        })
    }
}

impl Profile {
    /// Folds `default_make_targets` into a single
    /// `--with-default-make-target=<targets>` configure argument, replacing
    /// one that is already there. Applying it again changes nothing.
    pub fn with_default_make_target_arg(mut self) -> Self {
        if self.default_make_targets.is_empty() {
            return self;
        }
        let arg = format!(
            "{DEFAULT_MAKE_TARGET_ARG}={}",
            self.default_make_targets.join(" ")
        );

        let mut found = false;
        self.configure_args = self
            .configure_args
            .into_iter()
            .filter_map(|existing| {
                if !is_default_make_target_arg(&existing) {
                    return Some(existing);
                }
                if found {
                    return None;
                }
                found = true;
                Some(arg.clone())
            })
            .collect();
        if !found {
            self.configure_args.push(arg);
        }
        self
    }
}

fn is_default_make_target_arg(arg: &str) -> bool {
    let name = arg.split_once('=').map_or(arg, |(name, _)| name);
    name == DEFAULT_MAKE_TARGET_ARG
}

pub fn complete_platforms(profiles: ProfileMap) -> Result<BTreeMap<String, Profile>> {
    profiles
        .into_iter()
        .map(|(name, declared)| {
            let profile = declared.complete(&name)?;
            Ok((name, profile))
        })
        .collect()
}

pub fn rewrite_default_make_targets(
    profiles: BTreeMap<String, Profile>,
) -> BTreeMap<String, Profile> {
    profiles
        .into_iter()
        .map(|(name, profile)| (name, profile.with_default_make_target_arg()))
        .collect()
}
