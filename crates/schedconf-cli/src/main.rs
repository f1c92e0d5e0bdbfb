use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use schedconf_core::config::{
    default_plugins, set_defaults_configuration, ConfigLoader, Configuration, DefaultingContext,
    ExtensionPoint, StaticFeatureGate,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "schedconf",
    author,
    version = "0.1.0",
    about = "Scheduler configuration defaulting tool"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(
        long,
        default_value = "",
        help = "Feature gate overrides, e.g. VolumeCapacityPriority=true"
    )]
    feature_gates: String,

    #[clap(long, short, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a configuration file, fill in defaults and print the result
    Default {
        #[clap(help = "Configuration file; an empty configuration is used when omitted")]
        config: Option<PathBuf>,

        #[clap(long, short, help = "Write the defaulted configuration to this file")]
        output: Option<PathBuf>,
    },
    /// List registered plugin argument kinds
    Kinds,
    /// Show the built-in plugin set every profile starts from
    Plugins,
    /// Show the effective state of every known feature gate
    Features,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let gates = StaticFeatureGate::from_str(&cli.feature_gates)
        .with_context(|| format!("Invalid --feature-gates value '{}'", cli.feature_gates))?;

    match cli.command {
        Commands::Default { config, output } => {
            let ctx = DefaultingContext::standard().with_feature_gate(gates);
            let mut configuration = match &config {
                Some(path) => ConfigLoader::from_file(path, ctx.registry())
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => Configuration::default(),
            };
            set_defaults_configuration(&mut configuration, &ctx)
                .context("Failed to default scheduler configuration")?;
            log::info!(
                "Defaulted configuration with {} profile(s)",
                configuration.profiles.len()
            );

            let yaml = ConfigLoader::to_yaml(&configuration)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, yaml)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!("Wrote defaulted configuration to {}", path.display());
                }
                None => print!("{}", yaml),
            }
        }
        Commands::Kinds => {
            let ctx = DefaultingContext::standard();
            for kind in ctx.registry().kinds() {
                println!("{}", kind);
            }
        }
        Commands::Plugins => {
            let plugins = default_plugins();
            for point in ExtensionPoint::ALL {
                let set = plugins.plugin_set(point);
                if set.enabled.is_empty() {
                    continue;
                }
                println!("{}:", point);
                for plugin in &set.enabled {
                    match plugin.weight {
                        Some(weight) => println!("  {} (weight {})", plugin.name, weight),
                        None => println!("  {}", plugin.name),
                    }
                }
            }
        }
        Commands::Features => {
            for (name, enabled) in gates.states() {
                println!("{}={}", name, enabled);
            }
        }
    }

    Ok(())
}
