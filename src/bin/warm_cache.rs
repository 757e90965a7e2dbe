// Pre-fills the analysis cache for every position of a game.
//
// Usage:
//   cargo run --release --bin warm_cache -- e2e4 e7e5 Nf3 Nc6 Bb5
//   cargo run --release --bin warm_cache -- --fen "<fen>" --config piereview.json e4 e5

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use piereview::cache::{normalize, EvalCache};
use piereview::config::ReviewConfig;
use piereview::eval::client::{ChessApiClient, EvalClient, EvalOutcome, UsageGate};
use piereview::tree::MoveTree;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evaluate every position of a move list into the analysis cache")]
struct Args {
    #[arg(long, default_value = "piereview.json")]
    config: PathBuf,

    /// Starting position (defaults to the standard start)
    #[arg(long)]
    fen: Option<String>,

    /// Moves in coordinate (e2e4) or algebraic (Nf3) notation
    moves: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = ReviewConfig::load(&args.config);
    let settings = cfg.engine.clone().clamped();

    let mut tree = match args.fen.as_deref() {
        Some(fen) => MoveTree::from_fen(fen).context("invalid --fen")?,
        None => MoveTree::new(),
    };
    let applied = tree.play_sequence(args.moves.iter().map(String::as_str));
    if applied < args.moves.len() {
        bail!("illegal move {:?} after {} moves", args.moves[applied], applied);
    }

    let gate = UsageGate::new();
    let client = ChessApiClient::new(cfg.retry, gate.clone());
    let mut cache = EvalCache::open(&cfg.cache_path, cfg.cache_capacity);

    let fens: Vec<String> = tree.line().iter().map(|n| n.fen.clone()).collect();
    let progress = ProgressBar::new(fens.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("progress template")?,
    );

    let (mut fresh, mut cached, mut failed) = (0usize, 0usize, 0usize);
    for fen in &fens {
        progress.inc(1);
        if cache.contains(&normalize(fen)) {
            cached += 1;
            continue;
        }
        match client.evaluate(fen, &settings).await {
            EvalOutcome::Ready(raw) => match raw.format() {
                Some(result) => {
                    progress.set_message(result.score.to_string());
                    cache.put_fen(fen, result);
                    fresh += 1;
                }
                None => failed += 1,
            },
            EvalOutcome::UsageLimit => {
                progress.abandon_with_message("usage limit reached");
                break;
            }
            EvalOutcome::Unavailable => failed += 1,
        }
    }
    if !gate.is_tripped() { progress.finish_with_message("done"); }

    println!(
        "{} positions: {} evaluated, {} already cached, {} failed",
        fens.len(), fresh, cached, failed
    );
    if let Some(path) = cache.path() {
        println!("{}: {}/{} entries", path.display(), cache.len(), cache.capacity());
    }
    Ok(())
}
