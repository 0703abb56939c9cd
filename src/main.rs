use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use solo_picker::catalog::{self, Catalog};
use solo_picker::config::{Config, ConfigOverrides};
use solo_picker::engine::{explain, ScoredPlace};
use solo_picker::output::cards::{render_cards, APOLOGY_HTML};
use solo_picker::output::json::render_json;
use solo_picker::output::table::{render_explain_table, render_picks_table, render_places_table};
use solo_picker::prefs::{PreferenceForm, Preferences};
use solo_picker::server::run_server;
use solo_picker::session::Session;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const APOLOGY_TEXT: &str = "Oups. L'outil n'a pas chargé. Réessaie plus tard.";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Html,
}

#[derive(Debug, Parser)]
#[command(name = "solo-picker", about = "Solo-friendly place recommendations")]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Fallback places file.
    #[arg(short, long)]
    data: Option<String>,
    #[arg(long = "remote-url")]
    remote_url: Option<String>,
    #[arg(long = "remote-key")]
    remote_key: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct PreferenceArgs {
    /// quick, oneTwo or long
    #[arg(long)]
    duration: Option<String>,
    #[arg(long)]
    moment: Option<String>,
    /// zero, low, neutral or high
    #[arg(long)]
    energy: Option<String>,
    /// rain, dry or any
    #[arg(long)]
    rain: Option<String>,
    /// any, low or mid
    #[arg(long)]
    budget: Option<String>,
    #[arg(long)]
    category: Option<String>,
}

impl From<PreferenceArgs> for PreferenceForm {
    fn from(value: PreferenceArgs) -> Self {
        Self {
            duration: value.duration,
            moment: value.moment,
            energy: value.energy,
            rain: value.rain,
            budget: value.budget,
            category: value.category,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Pick {
        #[command(flatten)]
        prefs: PreferenceArgs,
        /// Extra draws with the same preferences.
        #[arg(long, default_value_t = 0)]
        rerolls: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Show the per-criterion score of each pick.
        #[arg(long)]
        explain: bool,
    },
    Places,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        fallback_path: cli.data.clone(),
        remote_url: cli.remote_url.clone(),
        remote_key: cli.remote_key.clone(),
    });

    match &cli.command {
        Commands::Config { init, show } => {
            handle_config_command(*init, *show, &config, &config_path)
        }
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            run_server(config, addr).await
        }
        Commands::Places => {
            let Some(catalog) = load_or_apologize(&config, cli.output).await else {
                return Ok(());
            };
            print_places(&catalog, cli.output)
        }
        Commands::Pick {
            prefs,
            rerolls,
            seed,
            explain,
        } => {
            let prefs = Preferences::try_from(PreferenceForm::from(prefs.clone()))?;
            let Some(catalog) = load_or_apologize(&config, cli.output).await else {
                return Ok(());
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };
            let mut session = Session::new(catalog);
            let picks = session.compute(prefs, &mut rng).to_vec();
            print_picks(&picks, session.last_prefs(), *explain, cli.output)?;
            for round in 0..*rerolls {
                info!("reroll {}", round + 1);
                let picks = session.reroll(&mut rng).to_vec();
                print_picks(&picks, session.last_prefs(), *explain, cli.output)?;
            }
            Ok(())
        }
    }
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &PathBuf,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

/// A failed load is reported with the fixed apology instead of an error.
async fn load_or_apologize(config: &Config, format: OutputFormat) -> Option<Catalog> {
    match catalog::load_from_config(&config.catalog).await {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            warn!("catalog load failed: {err}");
            match format {
                OutputFormat::Html => println!("{APOLOGY_HTML}"),
                OutputFormat::Table | OutputFormat::Json => println!("{APOLOGY_TEXT}"),
            }
            None
        }
    }
}

fn print_places(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_places_table(catalog.places())),
        OutputFormat::Json => println!("{}", render_json(catalog.places())?),
        OutputFormat::Html => println!("{}", render_cards(catalog.places())),
    }
    Ok(())
}

fn print_picks(
    picks: &[ScoredPlace],
    prefs: &Preferences,
    with_explain: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if picks.is_empty() {
                println!("Nothing matches these preferences.");
            } else {
                println!("{}", render_picks_table(picks));
            }
            if with_explain {
                for pick in picks {
                    let breakdown = explain(&pick.place, prefs);
                    println!("{}", render_explain_table(&pick.place.name, &breakdown));
                }
            }
        }
        OutputFormat::Json => println!("{}", render_json(picks)?),
        OutputFormat::Html => println!("{}", render_cards(picks.iter().map(|pick| &pick.place))),
    }
    Ok(())
}
