pub mod assemble;
pub mod common;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod input;
pub mod profiles;
pub mod tree;
pub mod validate;

pub use assemble::{JibConfig, generate, generate_from};
pub use error::{Error, Result};
pub use input::{DependencyPaths, InstallLayout, Input, PathAttribute};
