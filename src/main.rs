use clap::Parser;
use tick_pulse::cli::{Cli, Commands};
use tick_pulse::config::Config;

/// Fallback used when no config file is found
const DEFAULT_CONFIG: &str = include_str!("../config.toml.example");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::from_toml_str(DEFAULT_CONFIG)?
        }
    };
    config.validate()?;

    // Initialize telemetry
    tick_pulse::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting live feed");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Feed: {}", config.feed.url);
            println!("  Symbols: {}", config.feed.symbols.join(", "));
            println!(
                "  History: {} prices, candles of {} ticks",
                config.engine.history_capacity, config.engine.candle_bucket_size
            );
            println!(
                "  Highlight: {}ms, reconnect: {}ms",
                config.engine.highlight_clear_ms, config.engine.reconnect_delay_ms
            );
            println!(
                "  Logging: {} ({:?})",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}
