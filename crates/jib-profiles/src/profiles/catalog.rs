use crate::common::{Common, concat, strings};
use crate::input::Input;

use super::{DeclaredProfile, ProfileMap};

/// The declared profiles variants are derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileCatalog {
    /// One profile per supported platform.
    pub main: ProfileMap,
    /// Merged onto the generated `-open` variants before their debug
    /// variants are derived.
    pub open_extras: ProfileMap,
    /// Profiles that only run tests against an existing build.
    pub test: ProfileMap,
}

impl ProfileCatalog {
    pub fn builtin(input: &Input, common: &Common) -> Self {
        Self {
            main: main_profiles(common),
            open_extras: open_extras(),
            test: test_profiles(input),
        }
    }
}

fn main_profiles(common: &Common) -> ProfileMap {
    let mut main = ProfileMap::new();

    main.insert(
        "linux-x64".into(),
        DeclaredProfile {
            dependencies: concat(&common.dependencies, &["devkit"]),
            configure_args: concat(&common.configure_args, &["--with-zlib=system"]),
            default_make_targets: concat(&common.default_make_targets, &["docs-image"]),
            ..DeclaredProfile::target("linux", "x64")
        },
    );

    main.insert(
        "linux-x86".into(),
        DeclaredProfile {
            build_cpu: Some("x64".into()),
            dependencies: concat(&common.dependencies, &["devkit"]),
            configure_args: [
                common.configure_args.clone(),
                common.configure_args_32bit.clone(),
                strings(&[
                    "--with-jvm-variants=minimal,client,server",
                    "--with-zlib=system",
                ]),
            ]
            .concat(),
            default_make_targets: common.default_make_targets.clone(),
            ..DeclaredProfile::target("linux", "x86")
        },
    );

    main.insert(
        "macosx-x64".into(),
        DeclaredProfile {
            dependencies: concat(&common.dependencies, &["devkit"]),
            configure_args: concat(&common.configure_args, &["--with-zlib=system"]),
            default_make_targets: common.default_make_targets.clone(),
            ..DeclaredProfile::target("macosx", "x64")
        },
    );

    for cpu in ["x64", "sparcv9"] {
        main.insert(
            format!("solaris-{cpu}"),
            DeclaredProfile {
                dependencies: concat(&common.dependencies, &["devkit", "cups"]),
                configure_args: concat(&common.configure_args, &["--with-zlib=system"]),
                default_make_targets: common.default_make_targets.clone(),
                ..DeclaredProfile::target("solaris", cpu)
            },
        );
    }

    main.insert(
        "windows-x64".into(),
        DeclaredProfile {
            dependencies: concat(&common.dependencies, &["devkit", "freetype"]),
            configure_args: common.configure_args.clone(),
            default_make_targets: common.default_make_targets.clone(),
            ..DeclaredProfile::target("windows", "x64")
        },
    );

    main.insert(
        "windows-x86".into(),
        DeclaredProfile {
            build_cpu: Some("x64".into()),
            dependencies: concat(&common.dependencies, &["devkit", "freetype"]),
            configure_args: [
                concat(&common.configure_args, &["--with-jvm-variants=client,server"]),
                common.configure_args_32bit.clone(),
            ]
            .concat(),
            default_make_targets: common.default_make_targets.clone(),
            ..DeclaredProfile::target("windows", "x86")
        },
    );

    main
}

// Reference builds on linux also produce the compact profile images.
fn open_extras() -> ProfileMap {
    ["linux-x64-open", "linux-x86-open"]
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                DeclaredProfile {
                    default_make_targets: strings(&["profiles"]),
                    ..Default::default()
                },
            )
        })
        .collect()
}

fn test_profiles(input: &Input) -> ProfileMap {
    let mut test = ProfileMap::new();
    test.insert(
        "run-test".into(),
        DeclaredProfile {
            dependencies: strings(&["jtreg", "gnumake"]),
            labels: strings(&["test"]),
            ..DeclaredProfile::target(input.build_os.clone(), input.build_cpu.clone())
        },
    );
    test
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ProfileCatalog {
        let input = Input::new("windows", "x86", "windows", "x64");
        let common = Common::new(&input);
        ProfileCatalog::builtin(&input, &common)
    }

    #[test]
    fn seven_main_profiles() {
        let names: Vec<_> = catalog().main.into_keys().collect();
        assert_eq!(
            names,
            [
                "linux-x64",
                "linux-x86",
                "macosx-x64",
                "solaris-sparcv9",
                "solaris-x64",
                "windows-x64",
                "windows-x86",
            ]
        );
    }

    #[test]
    fn x86_profiles_build_on_x64() {
        let c = catalog();
        for name in ["linux-x86", "windows-x86"] {
            assert_eq!(c.main[name].build_cpu.as_deref(), Some("x64"), "{name}");
            assert!(
                c.main[name]
                    .configure_args
                    .contains(&"--with-target-bits=32".to_string()),
                "{name}"
            );
        }
        assert_eq!(c.main["linux-x64"].build_cpu, None);
    }

    #[test]
    fn platform_specific_dependencies() {
        let c = catalog();
        assert_eq!(
            c.main["solaris-x64"].dependencies,
            ["boot_jdk", "gnumake", "jtreg", "devkit", "cups"]
        );
        assert_eq!(
            c.main["windows-x64"].dependencies,
            ["boot_jdk", "gnumake", "jtreg", "devkit", "freetype"]
        );
        assert_eq!(
            c.main["linux-x64"].dependencies,
            ["boot_jdk", "gnumake", "jtreg", "devkit"]
        );
    }

    #[test]
    fn windows_x86_argument_order() {
        assert_eq!(
            catalog().main["windows-x86"].configure_args,
            [
                "--enable-jtreg-failure-handler",
                "--with-jvm-variants=client,server",
                "--with-target-bits=32",
            ]
        );
    }

    #[test]
    fn run_test_targets_the_build_host() {
        let c = catalog();
        let p = &c.test["run-test"];
        assert_eq!(p.target_os.as_deref(), Some("windows"));
        assert_eq!(p.target_cpu.as_deref(), Some("x64"));
        assert_eq!(p.labels, ["test"]);
        assert_eq!(p.dependencies, ["jtreg", "gnumake"]);
    }
}
