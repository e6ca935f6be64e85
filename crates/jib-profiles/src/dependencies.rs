use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::Common;
use crate::input::{DependencyPaths, Input, PathAttribute};

/// Legacy distribution server with its own layout.
pub const JAVARE_SERVER: &str = "javare";

/// Devkit revision per `<os>_<cpu>` platform.
pub type DevkitRevisions = BTreeMap<String, String>;

pub fn devkit_revisions() -> DevkitRevisions {
    [
        ("linux_x64", "gcc4.9.2-OEL6.4+1.0"),
        ("macosx_x64", "Xcode6.3-MacOSX10.9+1.0"),
        ("solaris_x64", "SS12u4-Solaris11u1+1.0"),
        ("solaris_sparcv9", "SS12u4-Solaris11u1+1.0"),
        ("windows_x64", "VS2013SP4+1.0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Server(ServerDependency),
    Organization(OrganizationDependency),
}

impl Dependency {
    pub fn revision(&self) -> Option<&str> {
        match self {
            Self::Server(d) => d.revision.as_deref(),
            Self::Organization(d) => d.revision.as_deref(),
        }
    }

    pub fn organization(&self) -> Option<&str> {
        match self {
            Self::Server(_) => None,
            Self::Organization(d) => Some(&d.organization),
        }
    }

    pub fn module(&self) -> Option<&str> {
        match self {
            Self::Server(d) => d.module.as_deref(),
            Self::Organization(d) => d.module.as_deref(),
        }
    }

    pub fn configure_args(&self) -> &[String] {
        match self {
            Self::Server(d) => &d.configure_args,
            Self::Organization(d) => &d.configure_args,
        }
    }
}

/// Maven-like `<organization>/<module>/<revision>` artifact. The module
/// defaults to the dependency name when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDependency {
    pub organization: String,
    pub ext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configure_args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_value: Option<String>,
    /// Prepended to PATH for both configure and make.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_path: Option<String>,
}

/// Artifact on an alternate server. Standard layouts use
/// module/revision/file, anything else `checksum_path` and `path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDependency {
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configure_args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_value: Option<String>,
}

/// `<build_os>-<build_cpu>` as named on the boot JDK server, which calls
/// 32-bit x86 `i586`.
pub fn boot_jdk_platform(input: &Input) -> String {
    let cpu = match input.build_cpu.as_str() {
        "x86" => "i586",
        other => other,
    };
    format!("{}-{}", input.build_os, cpu)
}

/// Devkit used for the target; 32-bit x86 is built with the x64 devkit.
pub fn devkit_platform(input: &Input) -> String {
    if input.target_cpu == "x86" {
        format!("{}_x64", input.target_os)
    } else {
        input.target_platform()
    }
}

pub fn build_dependencies(
    input: &Input,
    common: &Common,
    paths: &dyn DependencyPaths,
) -> BTreeMap<String, Dependency> {
    build_dependencies_with(input, common, paths, &devkit_revisions())
}

pub fn build_dependencies_with(
    input: &Input,
    common: &Common,
    paths: &dyn DependencyPaths,
    devkits: &DevkitRevisions,
) -> BTreeMap<String, Dependency> {
    let mut deps = BTreeMap::new();
    let on_windows = input.build_os == "windows";

    let boot_platform = boot_jdk_platform(input);
    let boot_home = if input.build_os == "macosx" {
        "jdk1.8.0.jdk/Contents/Home"
    } else {
        "jdk1.8.0"
    };
    deps.insert(
        "boot_jdk".to_string(),
        Dependency::Server(ServerDependency {
            server: JAVARE_SERVER.into(),
            module: Some("jdk".into()),
            revision: Some("8".into()),
            checksum_file: Some(format!("{boot_platform}/MD5_VALUES")),
            file: Some(format!("{boot_platform}/jdk-8-{boot_platform}.tar.gz")),
            configure_args: vec![format!(
                "--with-boot-jdk={}/{boot_home}",
                paths.get("boot_jdk", PathAttribute::InstallPath)
            )],
            ..Default::default()
        }),
    );

    deps.insert(
        "devkit".to_string(),
        devkit(common, devkits, &devkit_platform(input)),
    );
    deps.insert(
        "build_devkit".to_string(),
        devkit(common, devkits, &input.build_platform()),
    );

    deps.insert(
        "cups".to_string(),
        Dependency::Organization(OrganizationDependency {
            organization: common.organization.clone(),
            ext: "tar.gz".into(),
            revision: Some("1.0118+1.0".into()),
            ..Default::default()
        }),
    );

    deps.insert(
        "jtreg".to_string(),
        Dependency::Server(ServerDependency {
            server: JAVARE_SERVER.into(),
            revision: Some("4.2".into()),
            build_number: Some("b01".into()),
            checksum_file: Some("MD5_VALUES".into()),
            file: Some("jtreg_bin-4.2.zip".into()),
            environment_name: Some("JT_HOME".into()),
            ..Default::default()
        }),
    );

    // On windows make comes from the unix layer rather than the host.
    let make_platform = if on_windows {
        input.build_osenv_platform().unwrap_or_else(|| {
            tracing::warn!(
                build_platform = %input.build_platform(),
                "no unix layer described for windows build host; using build platform"
            );
            input.build_platform()
        })
    } else {
        input.build_platform()
    };
    let make_bin = format!(
        "{}/{}",
        paths.get("gnumake", PathAttribute::InstallPath),
        if on_windows { "cygwin/bin" } else { "bin" }
    );
    deps.insert(
        "gnumake".to_string(),
        Dependency::Organization(OrganizationDependency {
            organization: common.organization.clone(),
            ext: "tar.gz".into(),
            revision: Some("4.0+1.0".into()),
            module: Some(format!("gnumake-{make_platform}")),
            configure_args: vec![format!("MAKE={make_bin}/make")],
            environment_path: Some(make_bin),
            ..Default::default()
        }),
    );

    deps.insert(
        "freetype".to_string(),
        Dependency::Organization(OrganizationDependency {
            organization: common.organization.clone(),
            ext: "tar.gz".into(),
            revision: Some("2.3.4+1.0".into()),
            module: Some(format!("freetype-{}", input.target_platform())),
            ..Default::default()
        }),
    );

    tracing::debug!(count = deps.len(), "declared dependencies");
    deps
}

fn devkit(common: &Common, devkits: &DevkitRevisions, platform: &str) -> Dependency {
    let revision = devkits.get(platform).cloned();
    if revision.is_none() {
        tracing::warn!(platform, "no devkit revision for platform");
    }
    Dependency::Organization(OrganizationDependency {
        organization: common.organization.clone(),
        ext: "tar.gz".into(),
        module: Some(format!("devkit-{platform}")),
        revision,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(dep: &str, attr: PathAttribute) -> String {
        format!("/deps/{dep}/{attr}")
    }

    fn deps_for(input: &Input) -> BTreeMap<String, Dependency> {
        build_dependencies(input, &Common::new(input), &paths)
    }

    fn org(dep: &Dependency) -> &OrganizationDependency {
        match dep {
            Dependency::Organization(d) => d,
            other => panic!("expected organization layout, got {other:?}"),
        }
    }

    fn server(dep: &Dependency) -> &ServerDependency {
        match dep {
            Dependency::Server(d) => d,
            other => panic!("expected server layout, got {other:?}"),
        }
    }

    #[test]
    fn boot_jdk_platform_renames_x86() {
        let input = Input::new("windows", "x86", "windows", "x86");
        assert_eq!(boot_jdk_platform(&input), "windows-i586");
        let input = Input::new("linux", "x64", "linux", "x64");
        assert_eq!(boot_jdk_platform(&input), "linux-x64");
    }

    #[test]
    fn x86_targets_use_the_x64_devkit() {
        let input = Input::new("linux", "x86", "linux", "x64");
        assert_eq!(devkit_platform(&input), "linux_x64");
        let input = Input::new("solaris", "sparcv9", "solaris", "sparcv9");
        assert_eq!(devkit_platform(&input), "solaris_sparcv9");
    }

    #[test]
    fn boot_jdk_on_linux() {
        let input = Input::new("linux", "x64", "linux", "x64");
        let deps = deps_for(&input);
        let boot = server(&deps["boot_jdk"]);
        assert_eq!(boot.server, "javare");
        assert_eq!(boot.module.as_deref(), Some("jdk"));
        assert_eq!(boot.revision.as_deref(), Some("8"));
        assert_eq!(boot.checksum_file.as_deref(), Some("linux-x64/MD5_VALUES"));
        assert_eq!(
            boot.file.as_deref(),
            Some("linux-x64/jdk-8-linux-x64.tar.gz")
        );
        assert_eq!(
            boot.configure_args,
            ["--with-boot-jdk=/deps/boot_jdk/install_path/jdk1.8.0"]
        );
    }

    #[test]
    fn boot_jdk_on_macosx_uses_bundle_layout() {
        let input = Input::new("macosx", "x64", "macosx", "x64");
        let deps = deps_for(&input);
        assert_eq!(
            deps["boot_jdk"].configure_args(),
            ["--with-boot-jdk=/deps/boot_jdk/install_path/jdk1.8.0.jdk/Contents/Home"]
        );
    }

    #[test]
    fn devkits_resolve_revisions() {
        let input = Input::new("windows", "x86", "windows", "x64");
        let deps = deps_for(&input);
        let devkit = org(&deps["devkit"]);
        assert_eq!(devkit.module.as_deref(), Some("devkit-windows_x64"));
        assert_eq!(devkit.revision.as_deref(), Some("VS2013SP4+1.0"));
        assert_eq!(devkit.organization, "jpg.infra.builddeps");
        let build = org(&deps["build_devkit"]);
        assert_eq!(build.module.as_deref(), Some("devkit-windows_x64"));
    }

    #[test]
    fn unknown_devkit_platform_has_no_revision() {
        let input = Input::new("linux", "aarch64", "linux", "aarch64");
        let deps = deps_for(&input);
        assert_eq!(deps["devkit"].module(), Some("devkit-linux_aarch64"));
        assert_eq!(deps["devkit"].revision(), None);
        assert_eq!(deps["build_devkit"].revision(), None);
    }

    #[test]
    fn substituted_devkit_table() {
        let input = Input::new("linux", "aarch64", "linux", "aarch64");
        let mut table = devkit_revisions();
        table.insert("linux_aarch64".into(), "gcc7.3.0+1.0".into());
        let deps = build_dependencies_with(&input, &Common::new(&input), &paths, &table);
        assert_eq!(deps["devkit"].revision(), Some("gcc7.3.0+1.0"));
    }

    #[test]
    fn gnumake_on_unix() {
        let input = Input::new("linux", "x64", "linux", "x64");
        let deps = deps_for(&input);
        let make = org(&deps["gnumake"]);
        assert_eq!(make.module.as_deref(), Some("gnumake-linux_x64"));
        assert_eq!(
            make.configure_args,
            ["MAKE=/deps/gnumake/install_path/bin/make"]
        );
        assert_eq!(
            make.environment_path.as_deref(),
            Some("/deps/gnumake/install_path/bin")
        );
    }

    #[test]
    fn gnumake_on_windows_uses_unix_layer() {
        let mut input = Input::new("windows", "x64", "windows", "x64");
        input.build_osenv = Some("cygwin".into());
        input.build_osenv_platform = Some("windows_x86".into());
        let deps = deps_for(&input);
        let make = org(&deps["gnumake"]);
        assert_eq!(make.module.as_deref(), Some("gnumake-windows_x86"));
        assert_eq!(
            make.configure_args,
            ["MAKE=/deps/gnumake/install_path/cygwin/bin/make"]
        );
        assert_eq!(
            make.environment_path.as_deref(),
            Some("/deps/gnumake/install_path/cygwin/bin")
        );
    }

    #[test]
    fn freetype_and_jtreg() {
        let input = Input::new("windows", "x86", "windows", "x64");
        let deps = deps_for(&input);
        assert_eq!(deps["freetype"].module(), Some("freetype-windows_x86"));
        assert_eq!(deps["freetype"].revision(), Some("2.3.4+1.0"));
        let jtreg = server(&deps["jtreg"]);
        assert_eq!(jtreg.environment_name.as_deref(), Some("JT_HOME"));
        assert_eq!(jtreg.build_number.as_deref(), Some("b01"));
        assert_eq!(jtreg.module, None);
        assert_eq!(deps["cups"].module(), None);
        assert_eq!(deps.len(), 7);
    }

    #[test]
    fn shapes_serialize_without_tags() {
        let input = Input::new("linux", "x64", "linux", "x64");
        let deps = deps_for(&input);
        let json = serde_json::to_value(&deps).unwrap();
        assert_eq!(json["jtreg"]["server"], "javare");
        assert_eq!(json["cups"]["organization"], "jpg.infra.builddeps");
        assert!(json["cups"].get("module").is_none());
        assert!(json["cups"].get("configure_args").is_none());
    }
}
