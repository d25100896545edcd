mod app;
mod feed;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use swipebridge_config::{
    apply_all_defaults, check_report, config_dir, config_file_path, load_and_prepare, write_config,
    BridgeConfig,
};
use swipebridge_intents::{detect_intent, IntentRegistry};
use swipebridge_logging::init_logger;

use app::HostApp;
use feed::{FeedClient, DEFAULT_FEED_LEN};

#[derive(Parser)]
#[command(name = "swipebridge")]
#[command(about = "SwipeBridge — route voice intents to UI commands")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.swipebridge/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the host and dispatch phrases read from stdin
    Run {
        /// Number of items in the demo feed
        #[arg(long, default_value_t = DEFAULT_FEED_LEN)]
        feed_len: usize,
    },
    /// Dispatch one intent by its identifier (e.g. SwipeUpIntent)
    Dispatch {
        identifier: String,

        /// Number of items in the demo feed
        #[arg(long, default_value_t = DEFAULT_FEED_LEN)]
        feed_len: usize,
    },
    /// List the built-in intents
    Intents,
    /// Write a config file populated with defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    let (config, report) = load_and_prepare(&path).await?;
    let logging = config.logging.clone().unwrap_or_default();
    init_logger(
        logging.dir.as_deref().map(Path::new),
        logging.level.as_deref().unwrap_or("info"),
        logging.json.unwrap_or(false),
    );
    check_report(&report)?;
    info!(path = %path.display(), "Config ready");

    match cli.command {
        Commands::Run { feed_len } => run(&config, feed_len).await,
        Commands::Dispatch {
            identifier,
            feed_len,
        } => dispatch_once(&config, &identifier, feed_len).await,
        Commands::Intents => {
            list_intents();
            Ok(())
        }
        Commands::InitConfig { force } => init_config(&path, force).await,
    }
}

fn launch_with_feed(config: &BridgeConfig, feed_len: usize) -> Result<(HostApp, Arc<FeedClient>)> {
    let app = HostApp::launch(config)?;
    let feed = Arc::new(FeedClient::new(feed_len));
    let name = app.channel().name().to_string();
    app.attach_client(&name, feed.clone())?;
    Ok((app, feed))
}

async fn run(config: &BridgeConfig, feed_len: usize) -> Result<()> {
    let (mut app, feed) = launch_with_feed(config, feed_len)?;
    println!("Say a phrase (\"swipe up\", \"swipe down\"); \"quit\" to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        match detect_intent(line) {
            Some(intent) => {
                let response = app.dispatcher().dispatch(intent).await;
                match &response.payload {
                    Some(payload) => println!("{intent}: {} {payload}", response.code.as_str()),
                    None => println!("{intent}: {}", response.code.as_str()),
                }
            }
            None => {
                warn!(phrase = %line, "No intent matches phrase");
                println!("unrecognized: {line}");
            }
        }
    }

    app.finish_donation().await;
    info!(position = feed.position(), "Host stopped");
    Ok(())
}

async fn dispatch_once(config: &BridgeConfig, identifier: &str, feed_len: usize) -> Result<()> {
    let (mut app, _feed) = launch_with_feed(config, feed_len)?;
    let response = app.extension().handle(identifier).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    app.finish_donation().await;
    Ok(())
}

fn list_intents() {
    for def in IntentRegistry::new().all() {
        println!(
            "{:<16} {:<10} \"{}\"  {}",
            def.identifier, def.command_name, def.suggested_phrase, def.description
        );
    }
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    write_config(&apply_all_defaults(BridgeConfig::default()), path).await?;
    println!("Wrote {}", path.display());
    Ok(())
}
