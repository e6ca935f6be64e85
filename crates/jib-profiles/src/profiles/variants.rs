use crate::common::Common;

use super::{DebugLevel, DeclaredProfile, ProfileMap};

fn derive<F>(profiles: &ProfileMap, suffix: &str, mut adjust: F) -> ProfileMap
where
    F: FnMut(&mut DeclaredProfile),
{
    profiles
        .iter()
        .map(|(name, profile)| {
            let mut variant = profile.clone();
            adjust(&mut variant);
            (format!("{name}-{suffix}"), variant)
        })
        .collect()
}

/// `<name>-debug` for every profile: fastdebug level, debug make targets.
pub fn debug_profiles(common: &Common, profiles: &ProfileMap) -> ProfileMap {
    derive(profiles, "debug", |p| {
        p.debug_level = Some(DebugLevel::Fastdebug);
        p.default_make_targets = common.default_make_targets_debug.clone();
        p.labels.push("debug".into());
        p.configure_args
            .extend(common.configure_args_debug.iter().cloned());
    })
}

pub fn slowdebug_profiles(common: &Common, profiles: &ProfileMap) -> ProfileMap {
    derive(profiles, "slowdebug", |p| {
        p.debug_level = Some(DebugLevel::Slowdebug);
        p.default_make_targets = common.default_make_targets_slowdebug.clone();
        p.labels.push("slowdebug".into());
        p.configure_args
            .extend(common.configure_args_slowdebug.iter().cloned());
    })
}

/// `<name>-open` for every profile, restricted to openly licensed parts.
pub fn open_profiles(profiles: &ProfileMap) -> ProfileMap {
    derive(profiles, "open", |p| {
        p.labels.push("open".into());
        p.configure_args.push("--enable-openjdk-only".into());
    })
}
