use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::task::LocalSet;

use piereview::cache::EvalCache;
use piereview::config::ReviewConfig;
use piereview::eval::client::{ChessApiClient, UsageGate};
use piereview::repl::ReviewConsole;
use piereview::session::SessionBook;
use piereview::Analyzer;

#[derive(Parser, Debug)]
#[command(author, version, about = "Review chess games with remote engine analysis", long_about = None)]
struct Args {
    /// Path to the JSON config file
    #[arg(long, default_value = "piereview.json")]
    config: PathBuf,

    /// Start from this position instead of the saved session
    #[arg(long)]
    fen: Option<String>,

    /// Engine search depth (10-18)
    #[arg(long)]
    depth: Option<u32>,

    /// Number of alternative lines to request (1-5)
    #[arg(long)]
    variants: Option<u32>,

    /// Override the evaluation endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// Override the cache snapshot path
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Override the saved sessions path
    #[arg(long)]
    sessions: Option<PathBuf>,

    /// Write the effective config back to --config and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = ReviewConfig::load(&args.config);
    if let Some(d) = args.depth { cfg.engine.depth = d; }
    if let Some(v) = args.variants { cfg.engine.variants = v; }
    if let Some(url) = args.api_url { cfg.engine.api_url = url; }
    if let Some(p) = args.cache { cfg.cache_path = p; }
    if let Some(p) = args.sessions { cfg.sessions_path = p; }
    cfg.engine = cfg.engine.clamped();

    if args.write_config {
        cfg.save(&args.config)?;
        println!("wrote {}", args.config.display());
        return Ok(());
    }

    let gate = UsageGate::new();
    let client = ChessApiClient::new(cfg.retry, gate.clone());
    let cache = EvalCache::open(&cfg.cache_path, cfg.cache_capacity);
    let analyzer = Analyzer::new(client, cache, gate, cfg.engine.clone(), cfg.scheduler);
    let book = SessionBook::open(&cfg.sessions_path);
    let start_fen = args.fen;

    let local = LocalSet::new();
    local
        .run_until(async move {
            let mut console = ReviewConsole::new(analyzer, book);
            if let Some(fen) = start_fen.as_deref() {
                console.handle(&format!("fen {}", fen));
            }
            console.run_loop().await
        })
        .await?;
    Ok(())
}
