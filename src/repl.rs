//! Line-oriented review console.
//!
//! Commands are read from stdin while analysis tasks keep running on the same
//! `LocalSet`, so evaluations arrive between prompts. Every mutation saves the
//! active session.

use std::fmt::Write as _;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::analysis::Analyzer;
use crate::board::MoveInput;
use crate::eval::client::EvalClient;
use crate::review::win_chance;
use crate::session::SessionBook;

const HELP: &str = "commands: move <m>, seq <m>..., best, back, fwd, start, end, jump <n>, \
swap <node> <variation>, fen <fen>, new, games, load <id>, depth <n>, lines <n>, show, quit";

pub struct ReviewConsole<C> {
    analyzer: Analyzer<C>,
    book: SessionBook,
}

impl<C: EvalClient + 'static> ReviewConsole<C> {
    /// Restores the active session into `analyzer` and starts analysing it.
    pub fn new(analyzer: Analyzer<C>, mut book: SessionBook) -> Self {
        let restored = book.active_id().map(|id| book.load(id));
        match restored {
            Some(Ok(tree)) => analyzer.replace_tree(tree),
            Some(Err(e)) => {
                log::warn!("could not restore the active session: {}", e);
                analyzer.refresh();
            }
            None => analyzer.refresh(),
        }
        Self { analyzer, book }
    }

    pub fn analyzer(&self) -> &Analyzer<C> { &self.analyzer }
    pub fn book(&self) -> &SessionBook { &self.book }

    fn save(&mut self) { self.book.save_current(&self.analyzer.tree()); }

    /// Executes one command line. Returns `false` once the console should exit.
    pub fn handle(&mut self, line: &str) -> bool {
        let mut tokens = line.split_whitespace();
        let Some(cmd) = tokens.next() else { return true };
        let args: Vec<&str> = tokens.collect();
        match cmd {
            "quit" | "exit" => return false,
            "move" | "m" => match args.first() {
                Some(m) => match self.analyzer.play_move(&MoveInput::parse(m)) {
                    Some(_) => self.save(),
                    None => println!("illegal move: {}", m),
                },
                None => println!("usage: move <e2e4|Nf3>"),
            },
            "seq" => {
                let applied = self.analyzer.play_sequence(args.iter().copied());
                if applied < args.len() { println!("stopped after {} of {} moves", applied, args.len()); }
                if applied > 0 { self.save(); }
            }
            "best" => match self.analyzer.play_best_move() {
                Some(_) => self.save(),
                None => println!("no evaluation to play from yet"),
            },
            "back" => { self.analyzer.step_back(); }
            "fwd" => { self.analyzer.step_forward(); }
            "start" => { self.analyzer.jump_start(); }
            "end" => { self.analyzer.jump_end(); }
            "jump" => match args.first().and_then(|s| s.parse::<usize>().ok()) {
                Some(i) if self.analyzer.jump_to(i) => {}
                _ => println!("usage: jump <index within the line>"),
            },
            "swap" => {
                let node = args.first().and_then(|s| s.parse::<usize>().ok());
                let var = args.get(1).and_then(|s| s.parse::<usize>().ok());
                match (node, var) {
                    (Some(n), Some(v)) if self.analyzer.swap_variation(n, v) => self.save(),
                    _ => println!("usage: swap <node> <variation>"),
                }
            }
            "fen" => match self.analyzer.load_fen(&args.join(" ")) {
                Ok(()) => self.save(),
                Err(e) => println!("{}", e),
            },
            "new" => {
                self.book.new_game();
                self.analyzer.new_game();
            }
            "games" => {
                for g in self.book.games() {
                    let marker = if Some(g.id) == self.book.active_id() { '*' } else { ' ' };
                    let last = g.last_move.as_ref().map(|m| m.san.as_str()).unwrap_or("-");
                    println!("{} {} {} plies, last {}", marker, g.id, g.history.len().saturating_sub(1), last);
                }
            }
            "load" => match args.first().and_then(|s| s.parse::<u64>().ok()) {
                Some(id) => match self.book.load(id) {
                    Ok(tree) => self.analyzer.replace_tree(tree),
                    Err(e) => println!("{}", e),
                },
                None => println!("usage: load <id>"),
            },
            "depth" | "lines" => match args.first().and_then(|s| s.parse::<u32>().ok()) {
                Some(n) => {
                    let mut settings = self.analyzer.settings();
                    if cmd == "depth" { settings.depth = n; } else { settings.variants = n; }
                    let settings = settings.clamped();
                    println!("depth {}, {} line(s)", settings.depth, settings.variants);
                    self.analyzer.set_engine_settings(settings);
                }
                None => println!("usage: {} <n>", cmd),
            },
            "show" => print!("{}", self.render()),
            _ => println!("{}", HELP),
        }
        true
    }

    /// Text view of the active line, variations and the evaluation on display.
    pub fn render(&self) -> String {
        let tree = self.analyzer.tree();
        let mut out = String::new();
        for (i, node) in tree.line().iter().enumerate() {
            let marker = if i == tree.index() { '>' } else { ' ' };
            let san = node.mv.as_ref().map(|m| m.san.as_str()).unwrap_or("(start)");
            let note = self.analyzer.annotation(i).map(|a| a.symbol()).unwrap_or("");
            let score = node.analysis.as_ref().map(|r| r.score.to_string()).unwrap_or_default();
            let _ = writeln!(out, "{} {:>3} {}{} {}", marker, i, san, note, score);
            for (v, var) in node.variations.iter().enumerate() {
                let moves: Vec<&str> = var.iter().filter_map(|n| n.mv.as_ref().map(|m| m.san.as_str())).collect();
                let _ = writeln!(out, "        ({}) {}", v, moves.join(" "));
            }
        }
        let _ = writeln!(out, "fen: {}", tree.current().fen);
        drop(tree);
        match self.analyzer.current_eval() {
            Some(r) => {
                let best = r.best_move.as_deref().unwrap_or("-");
                let _ = writeln!(out, "eval {} (depth {}, best {}, white {:.0}%)", r.score, r.depth, best, win_chance(r.score));
            }
            None if self.analyzer.is_calculating() => { let _ = writeln!(out, "calculating..."); }
            None => { let _ = writeln!(out, "no evaluation"); }
        }
        if let Some(outcome) = self.analyzer.game_over() { let _ = writeln!(out, "{}", outcome); }
        if self.analyzer.api_limit_reached() { let _ = writeln!(out, "evaluation usage limit reached"); }
        out
    }

    pub async fn run_loop(&mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(io::stdin()).lines();
        println!("{}", HELP);
        while let Some(line) = lines.next_line().await? {
            if !self.handle(line.trim()) { break; }
        }
        self.save();
        Ok(())
    }
}
