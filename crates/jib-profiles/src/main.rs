use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use jib_profiles::{Input, InstallLayout, JibConfig, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Log generation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the generated profiles and dependencies
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// List profile names with their debug level and labels
    Profiles {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Check the generated configuration for gaps on this platform
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

#[derive(Debug, ClapArgs)]
struct InputArgs {
    /// TOML file with input values (may use `extends`)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Active profile
    #[arg(long)]
    profile: Option<String>,
    #[arg(long)]
    target_os: Option<String>,
    #[arg(long)]
    target_cpu: Option<String>,
    #[arg(long)]
    build_os: Option<String>,
    #[arg(long)]
    build_cpu: Option<String>,
    /// Unix layer on the build host (windows only)
    #[arg(long)]
    build_osenv: Option<String>,
    #[arg(long)]
    build_osenv_cpu: Option<String>,
    /// Unix layer platform; derived from the layer and its cpu when unset
    #[arg(long)]
    build_osenv_platform: Option<String>,
    /// Root dependencies are installed and downloaded under
    #[arg(long, default_value = "deps")]
    install_root: PathBuf,
}

impl InputArgs {
    fn resolve(&self) -> Result<Input> {
        let mut input = match &self.input {
            Some(path) => jib_profiles::config::load_as::<Input>(path)?,
            None => Input::host(),
        };
        if let Some(v) = &self.profile {
            input.profile = Some(v.clone());
        }
        // A changed os or cpu invalidates the platform it was loaded with.
        if let Some(v) = &self.target_os {
            input.target_os = v.clone();
            input.target_platform = None;
        }
        if let Some(v) = &self.target_cpu {
            input.target_cpu = v.clone();
            input.target_platform = None;
        }
        if let Some(v) = &self.build_os {
            input.build_os = v.clone();
            input.build_platform = None;
        }
        if let Some(v) = &self.build_cpu {
            input.build_cpu = v.clone();
            input.build_platform = None;
            if input.build_osenv_cpu.is_none() {
                input.build_osenv_platform = None;
            }
        }
        if let Some(v) = &self.build_osenv {
            input.build_osenv = Some(v.clone());
            input.build_osenv_platform = None;
        }
        if let Some(v) = &self.build_osenv_cpu {
            input.build_osenv_cpu = Some(v.clone());
            input.build_osenv_platform = None;
        }
        if let Some(v) = &self.build_osenv_platform {
            input.build_osenv_platform = Some(v.clone());
        }
        Ok(input)
    }

    fn generate(&self) -> Result<(Input, JibConfig)> {
        let input = self.resolve()?;
        let layout = InstallLayout::new(&self.install_root);
        let config = jib_profiles::generate(&input, &layout)?;
        Ok((input, config))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    match args.cmd {
        Command::Generate { input, format } => cmd_generate(&input, format),
        Command::Profiles { input } => cmd_profiles(&input),
        Command::Validate { input } => cmd_validate(&input),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn cmd_generate(args: &InputArgs, format: Format) -> Result<()> {
    let (_, config) = args.generate()?;
    let out = match format {
        Format::Json => serde_json::to_string_pretty(&config)?,
        Format::Toml => toml::to_string_pretty(&config)?,
    };
    println!("{out}");
    Ok(())
}

fn cmd_profiles(args: &InputArgs) -> Result<()> {
    let (_, config) = args.generate()?;
    for (name, profile) in &config.profiles {
        println!(
            "{:<28} {:<10} {}",
            name,
            profile.debug_level.map_or("-", |l| l.as_str()),
            profile.labels.join(",")
        );
    }
    Ok(())
}

fn cmd_validate(args: &InputArgs) -> Result<()> {
    let (input, config) = args.generate()?;
    jib_profiles::validate::validate(&config, input.profile.as_deref()).map_err(|e| {
        e.context(format!(
            "{} built on {}",
            input.target_platform(),
            input.build_platform()
        ))
    })?;
    println!(
        "ok: {} profiles, {} dependencies",
        config.profiles.len(),
        config.dependencies.len()
    );
    Ok(())
}
