use crate::input::Input;

/// Defaults shared by every profile and dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Common {
    pub dependencies: Vec<String>,
    pub default_make_targets: Vec<String>,
    pub default_make_targets_debug: Vec<String>,
    pub default_make_targets_slowdebug: Vec<String>,
    pub configure_args: Vec<String>,
    pub configure_args_32bit: Vec<String>,
    pub configure_args_debug: Vec<String>,
    pub configure_args_slowdebug: Vec<String>,
    /// Organization dependencies built in-house are published under.
    pub organization: String,
}

impl Common {
    pub fn new(_input: &Input) -> Self {
        let default_make_targets = strings(&["product-images", "test-image"]);
        Self {
            dependencies: strings(&["boot_jdk", "gnumake", "jtreg"]),
            default_make_targets_debug: default_make_targets.clone(),
            default_make_targets_slowdebug: default_make_targets.clone(),
            default_make_targets,
            configure_args: strings(&["--enable-jtreg-failure-handler"]),
            configure_args_32bit: strings(&["--with-target-bits=32"]),
            configure_args_debug: strings(&["--enable-debug"]),
            configure_args_slowdebug: strings(&["--with-debug-level=slowdebug"]),
            organization: "jpg.infra.builddeps".into(),
        }
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// `base` followed by `extra`, as a new list.
pub(crate) fn concat(base: &[String], extra: &[&str]) -> Vec<String> {
    base.iter()
        .cloned()
        .chain(extra.iter().map(|s| s.to_string()))
        .collect()
}
