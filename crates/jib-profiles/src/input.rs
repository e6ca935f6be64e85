use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Pre-resolved facts about the build the caller is about to run.
///
/// Platform strings default to `<os>_<cpu>` when not given explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub target_os: String,
    pub target_cpu: String,
    pub build_os: String,
    pub build_cpu: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_platform: Option<String>,
    /// Unix layer on a non-unix build host, e.g. `cygwin` on windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_osenv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_osenv_cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_osenv_platform: Option<String>,
}

impl Input {
    pub fn new(
        target_os: impl Into<String>,
        target_cpu: impl Into<String>,
        build_os: impl Into<String>,
        build_cpu: impl Into<String>,
    ) -> Self {
        Self {
            profile: None,
            target_os: target_os.into(),
            target_cpu: target_cpu.into(),
            build_os: build_os.into(),
            build_cpu: build_cpu.into(),
            target_platform: None,
            build_platform: None,
            build_osenv: None,
            build_osenv_cpu: None,
            build_osenv_platform: None,
        }
    }

    /// Describes the machine this process runs on, targeting itself.
    pub fn host() -> Self {
        let os = host_os(std::env::consts::OS);
        let cpu = host_cpu(std::env::consts::ARCH);
        let mut input = Self::new(os, cpu, os, cpu);
        if os == "windows" {
            input.build_osenv = Some("cygwin".into());
            input.build_osenv_cpu = Some(cpu.into());
        }
        input
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn target_platform(&self) -> String {
        self.target_platform
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.target_os, self.target_cpu))
    }

    pub fn build_platform(&self) -> String {
        self.build_platform
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.build_os, self.build_cpu))
    }

    /// Platform of the unix layer, if one is described.
    pub fn build_osenv_platform(&self) -> Option<String> {
        if let Some(p) = &self.build_osenv_platform {
            return Some(p.clone());
        }
        let osenv = self.build_osenv.as_deref()?;
        let cpu = self.build_osenv_cpu.as_deref().unwrap_or(&self.build_cpu);
        Some(format!("{osenv}_{cpu}"))
    }
}

fn host_os(os: &'static str) -> &'static str {
    match os {
        "macos" => "macosx",
        other => other,
    }
}

fn host_cpu(arch: &'static str) -> &'static str {
    match arch {
        "x86_64" => "x64",
        "sparc64" => "sparcv9",
        other => other,
    }
}

/// Paths the caller resolves for a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathAttribute {
    InstallPath,
    DownloadPath,
    DownloadDir,
}

impl PathAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InstallPath => "install_path",
            Self::DownloadPath => "download_path",
            Self::DownloadDir => "download_dir",
        }
    }
}

impl fmt::Display for PathAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup into state owned by whoever installs the dependencies.
pub trait DependencyPaths {
    fn get(&self, dependency: &str, attribute: PathAttribute) -> String;
}

impl<F> DependencyPaths for F
where
    F: Fn(&str, PathAttribute) -> String,
{
    fn get(&self, dependency: &str, attribute: PathAttribute) -> String {
        self(dependency, attribute)
    }
}

/// Fixed directory layout under a single root:
/// `install/<dep>`, `download/<dep>` and `download/<dep>/<dep>.bundle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub root: PathBuf,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DependencyPaths for InstallLayout {
    fn get(&self, dependency: &str, attribute: PathAttribute) -> String {
        let p = match attribute {
            PathAttribute::InstallPath => self.root.join("install").join(dependency),
            PathAttribute::DownloadDir => self.root.join("download").join(dependency),
            PathAttribute::DownloadPath => self
                .root
                .join("download")
                .join(dependency)
                .join(format!("{dependency}.bundle")),
        };
        // Consumers splice these into shell-style arguments.
        p.to_string_lossy().replace('\\', "/")
    }
}
