use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::Common;
use crate::dependencies::{self, Dependency, DevkitRevisions};
use crate::error::Result;
use crate::input::{DependencyPaths, Input};
use crate::profiles::{self, Profile, ProfileCatalog};

pub const FORMAT_VERSION: &str = "1.0";
pub const ORGANIZATION: &str = "com.oracle.jpg.jdk";
pub const OUTPUT_BASEDIR: &str = "build";
pub const CONFIGURATION_CONFIGURE_ARG: &str = "--with-conf-name=";
pub const CONFIGURATION_MAKE_ARG: &str = "CONF_NAME=";

/// Everything a fetch/build tool needs: the profiles and what they depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JibConfig {
    pub format_version: String,
    /// Used when publishing build results.
    pub organization: String,
    /// Builds land in `<output_basedir>/<configuration>`.
    pub output_basedir: String,
    pub configuration_configure_arg: String,
    pub configuration_make_arg: String,
    pub profiles: BTreeMap<String, Profile>,
    pub dependencies: BTreeMap<String, Dependency>,
}

impl JibConfig {
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.get(name)
    }
}

/// Generates the configuration for `input` from the built-in catalogs.
pub fn generate(input: &Input, paths: &dyn DependencyPaths) -> Result<JibConfig> {
    let common = Common::new(input);
    let catalog = ProfileCatalog::builtin(input, &common);
    generate_from(input, paths, &catalog, &dependencies::devkit_revisions())
}

pub fn generate_from(
    input: &Input,
    paths: &dyn DependencyPaths,
    catalog: &ProfileCatalog,
    devkits: &DevkitRevisions,
) -> Result<JibConfig> {
    let common = Common::new(input);
    let profiles = profiles::build_profiles_from(catalog, &common)?;
    let dependencies = dependencies::build_dependencies_with(input, &common, paths, devkits);
    tracing::debug!(
        profiles = profiles.len(),
        dependencies = dependencies.len(),
        target = %input.target_platform(),
        build = %input.build_platform(),
        "generated configuration"
    );

    Ok(JibConfig {
        format_version: FORMAT_VERSION.into(),
        organization: ORGANIZATION.into(),
        output_basedir: OUTPUT_BASEDIR.into(),
        configuration_configure_arg: CONFIGURATION_CONFIGURE_ARG.into(),
        configuration_make_arg: CONFIGURATION_MAKE_ARG.into(),
        profiles,
        dependencies,
    })
}
