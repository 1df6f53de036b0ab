//! Command-line entry point: generate one event pass.
//!
//! Prints the path of the written PNG on success.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passforge_core::{Config, Pillar};
use passforge_pass::{compose, select_avatar};

/// Default log filter when `RUST_LOG` is unset. Targets are per crate, so
/// each workspace crate must be listed for its events to show.
const DEFAULT_LOG_FILTER: &str =
    "passforge=info,passforge_core=info,passforge_comfyui=info,passforge_pass=info";

#[derive(Debug, Parser)]
#[command(name = "passforge", about = "Generate a personalized event pass")]
struct Cli {
    /// Pillar code selecting the template (ASD, CSD, ESD, EPD, DAI, SUTD).
    #[arg(long)]
    pillar: String,

    /// Identifier encoded into the QR code and the output filename.
    #[arg(long = "id")]
    identifier: String,

    /// Name displayed on the pass.
    #[arg(long, default_value = "Alex Tan")]
    name: String,

    /// Generate a custom avatar remotely instead of using a sample.
    #[arg(long)]
    custom_avatar: bool,

    /// Avatar type (e.g. Male, Female, Panda, Fox, Owl).
    #[arg(long, default_value = "Male")]
    avatar_type: String,

    /// Personal interest embedded into the generation prompt
    /// (required with --custom-avatar).
    #[arg(long)]
    interest: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let pillar: Pillar = cli.pillar.parse()?;
    tracing::info!(server = %config.server_address, %pillar, "passforge starting");

    let mut rng = rand::rng();
    let avatar = select_avatar(
        &config,
        cli.custom_avatar,
        &cli.avatar_type,
        cli.interest.as_deref(),
        &mut rng,
    )
    .await
    .context("Failed to select an avatar")?;

    let output_path = compose(&config, pillar, &cli.identifier, &cli.name, &avatar)
        .context("Failed to compose the event pass")?;

    println!("{}", output_path.display());
    Ok(())
}
