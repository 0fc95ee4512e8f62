//! ScamShield CLI binary.
//!
//! Fail-closed scam scanning for text and images.
//!
//! # Commands
//!
//! - `scan` - Run the full pipeline on text or an image file
//! - `rules` - Print the active heuristic rule table
//! - `serve` - Start the HTTP scan server
//!
//! Without an API credential (`SCAMSHIELD_API_KEY`/`GEMINI_API_KEY`) the
//! external stage fails closed and `scan` still reports the heuristic
//! signal merged with the canned suspicious result.

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use scamshield::{
    create_router, AppState, Config, HeuristicEngine, RuleSet, ScanRequest, Scanner,
    ServerConfig, VERSION,
};

#[derive(Parser)]
#[command(name = "scamshield")]
#[command(version = VERSION)]
#[command(about = "ScamShield - fail-closed scam and phishing scanner", long_about = None)]
struct Cli {
    /// Config file path (default: ~/.config/scamshield/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan text or an image for scam signals
    Scan {
        /// Text input (or - for stdin)
        input: Option<String>,

        /// Text input file path
        #[arg(short, long, conflicts_with = "image")]
        file: Option<PathBuf>,

        /// Image input file path
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Request the higher-effort analysis tier
        #[arg(short, long)]
        deep: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the active heuristic rule table
    Rules,

    /// Start the HTTP scan server
    Serve {
        /// Listen port
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Listen host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Bind to all interfaces
        #[arg(long)]
        bind_all: bool,

        /// Disable CORS
        #[arg(long)]
        no_cors: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan {
            input,
            file,
            image,
            deep,
            json,
        } => cmd_scan(config, input, file, image, deep, json),

        Commands::Rules => cmd_rules(&config),

        Commands::Serve {
            port,
            host,
            bind_all,
            no_cors,
        } => cmd_serve(config, port, &host, bind_all, no_cors),
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

/// Load config from the given path, the default location, or defaults,
/// then overlay environment variables.
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let mut config = if let Some(path) = path {
        Config::from_file(path)?
    } else {
        match Config::default_path().filter(|p| p.exists()) {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        }
    };

    config.apply_env();
    Ok(config)
}

fn cmd_scan(
    config: Config,
    input: Option<String>,
    file: Option<PathBuf>,
    image: Option<PathBuf>,
    deep: bool,
    json_output: bool,
) -> anyhow::Result<()> {
    let request = if let Some(path) = image {
        ScanRequest {
            image: Some(std::fs::read(path)?.into()),
            deep_scan: deep,
            ..Default::default()
        }
    } else {
        ScanRequest {
            text: Some(read_input(input, file)?),
            deep_scan: deep,
            ..Default::default()
        }
    };

    let scanner = Scanner::new(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let verdict = runtime.block_on(scanner.scan(request))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("Verdict:    {}", verdict.verdict);
        println!("Risk score: {}/100", verdict.risk_score);
        if !verdict.reasoning.is_empty() {
            println!();
            println!("{}", verdict.reasoning);
        }
        if !verdict.indicators.is_empty() {
            println!();
            println!("Indicators:");
            for indicator in &verdict.indicators {
                println!("  - {indicator}");
            }
        }
        if !verdict.advice.is_empty() {
            println!();
            println!("Advice: {}", verdict.advice);
        }
    }

    if verdict.verdict == scamshield::Verdict::Scam {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_rules(config: &Config) -> anyhow::Result<()> {
    let engine = if config.rules.is_empty() {
        HeuristicEngine::default()
    } else {
        HeuristicEngine::new(RuleSet::from_entries(&config.rules)?)
    };

    let entries = if config.rules.is_empty() {
        scamshield::default_rules()
    } else {
        config.rules.clone()
    };

    println!("Active heuristic rules ({}):", engine.rules().len());
    println!();
    println!("{:<42} {:>6}  Pattern", "Label", "Weight");
    println!("{}", "-".repeat(76));

    for entry in entries {
        println!("{:<42} {:>6}  {}", entry.label, entry.weight, entry.pattern);
    }

    Ok(())
}

fn cmd_serve(
    config: Config,
    port: u16,
    host: &str,
    bind_all: bool,
    no_cors: bool,
) -> anyhow::Result<()> {
    let mut server_config = ServerConfig::default().with_port(port);

    if bind_all {
        server_config = server_config.bind_all();
    } else {
        let addr: std::net::SocketAddr = format!("{host}:{port}").parse()?;
        server_config = server_config.with_addr(addr);
    }

    if no_cors {
        server_config = server_config.without_cors();
    }

    if config.analysis.api_key.is_none() {
        tracing::warn!("no API credential configured; external analysis will fail closed");
    }

    let addr = server_config.addr;
    let state = Arc::new(AppState::new(server_config, config)?);
    let app = create_router(state);

    tracing::info!("Starting ScamShield server on {addr}");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        Ok::<_, anyhow::Error>(())
    })
}

// Helper functions

fn read_input(input: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(path) = file {
        Ok(std::fs::read_to_string(path)?)
    } else if let Some(s) = input {
        if s == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        } else {
            Ok(s)
        }
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}
