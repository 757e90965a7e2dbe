//! Analysis scheduler.
//!
//! Every user action that moves the viewed position bumps a generation token and
//! re-runs the position state machine: checkmate is answered locally, cache and
//! node hits are served at once, and misses are debounced before a single request
//! goes out. A resolved position starts a paced background sweep over nearby nodes.
//!
//! All work runs on one thread (`spawn_local` on a `LocalSet`). Async steps capture
//! the generation they were started under and drop their effects once it moves on.

pub mod sweep;

use cozy_chess::Color;
use log::{debug, warn};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use tokio::time::sleep;

use crate::board::{MoveInput, Position};
use crate::cache::{normalize, EvalCache};
use crate::config::{EngineSettings, SchedulerConfig};
use crate::error::Result;
use crate::eval::client::{EvalClient, EvalOutcome, UsageGate};
use crate::eval::EvalResult;
use crate::review::{self, Annotation, GameOutcome};
use crate::tree::{Applied, MoveTree};

pub use sweep::sweep_order;

struct Shared<C> {
    client: C,
    config: SchedulerConfig,
    settings: RefCell<EngineSettings>,
    tree: RefCell<MoveTree>,
    cache: RefCell<EvalCache>,
    gate: UsageGate,
    generation: Cell<u64>,
    current_eval: RefCell<Option<EvalResult>>,
    calculating: Cell<bool>,
}

impl<C> Shared<C> {
    fn is_stale(&self, generation: u64) -> bool { self.generation.get() != generation }

    fn show(&self, result: Option<EvalResult>) {
        *self.current_eval.borrow_mut() = result;
    }

    /// Attaches to node `index`, or to the first node with the same FEN if the line moved.
    fn attach(&self, index: usize, fen: &str, result: EvalResult) {
        let mut tree = self.tree.borrow_mut();
        if tree.attach(index, fen, result.clone()) { return; }
        if let Some(i) = tree.find(fen) { tree.attach(i, fen, result); }
    }
}

pub struct Analyzer<C> {
    shared: Rc<Shared<C>>,
}

impl<C: EvalClient + 'static> Analyzer<C> {
    pub fn new(client: C, cache: EvalCache, gate: UsageGate, settings: EngineSettings, config: SchedulerConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                client,
                config,
                settings: RefCell::new(settings),
                tree: RefCell::new(MoveTree::new()),
                cache: RefCell::new(cache),
                gate,
                generation: Cell::new(0),
                current_eval: RefCell::new(None),
                calculating: Cell::new(false),
            }),
        }
    }

    pub fn tree(&self) -> Ref<'_, MoveTree> { self.shared.tree.borrow() }
    pub fn cache(&self) -> Ref<'_, EvalCache> { self.shared.cache.borrow() }
    pub fn settings(&self) -> EngineSettings { self.shared.settings.borrow().clone() }
    pub fn current_eval(&self) -> Option<EvalResult> { self.shared.current_eval.borrow().clone() }
    pub fn is_calculating(&self) -> bool { self.shared.calculating.get() }
    pub fn api_limit_reached(&self) -> bool { self.shared.gate.is_tripped() }
    pub fn generation(&self) -> u64 { self.shared.generation.get() }

    pub fn game_over(&self) -> Option<GameOutcome> { review::game_over(&self.tree()) }

    pub fn annotation(&self, index: usize) -> Option<Annotation> {
        review::annotate_move(&self.cache(), &self.tree(), index)
    }

    pub fn play_move(&self, input: &MoveInput) -> Option<Applied> {
        let applied = self.shared.tree.borrow_mut().apply_move(input);
        if applied.is_some() { self.refresh(); }
        applied
    }

    pub fn play_sequence<I>(&self, moves: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<MoveInput>,
    {
        let applied = self.shared.tree.borrow_mut().play_sequence(moves);
        if applied > 0 { self.refresh(); }
        applied
    }

    /// Plays the best move of the evaluation on display.
    pub fn play_best_move(&self) -> Option<Applied> {
        let best = self.current_eval()?.best_move?;
        self.play_move(&MoveInput::parse(&best))
    }

    pub fn jump_to(&self, index: usize) -> bool {
        let moved = self.shared.tree.borrow_mut().jump_to(index);
        if moved { self.refresh(); }
        moved
    }

    pub fn step_back(&self) -> bool {
        let index = self.tree().index();
        index > 0 && self.jump_to(index - 1)
    }

    pub fn step_forward(&self) -> bool {
        let index = self.tree().index();
        self.jump_to(index + 1)
    }

    pub fn jump_start(&self) -> bool { self.jump_to(0) }

    pub fn jump_end(&self) -> bool {
        let last = self.tree().last_index();
        self.jump_to(last)
    }

    pub fn swap_variation(&self, node_index: usize, variation_index: usize) -> bool {
        let swapped = self.shared.tree.borrow_mut().swap_variation(node_index, variation_index);
        if swapped { self.refresh(); }
        swapped
    }

    pub fn new_game(&self) { self.replace_tree(MoveTree::new()); }

    /// Starts over from `fen`. An invalid FEN leaves the current tree in place.
    pub fn load_fen(&self, fen: &str) -> Result<()> {
        let tree = MoveTree::from_fen(fen)?;
        self.replace_tree(tree);
        Ok(())
    }

    pub fn replace_tree(&self, tree: MoveTree) {
        *self.shared.tree.borrow_mut() = tree;
        self.refresh();
    }

    pub fn set_engine_settings(&self, settings: EngineSettings) {
        *self.shared.settings.borrow_mut() = settings;
        self.refresh();
    }

    /// Runs the state machine for the viewed position under a new generation.
    pub fn refresh(&self) {
        let s = &self.shared;
        let generation = s.generation.get() + 1;
        s.generation.set(generation);
        let (index, fen) = {
            let tree = s.tree.borrow();
            (tree.index(), tree.current().fen.clone())
        };
        let key = normalize(&fen);

        match Position::from_fen(&fen) {
            Ok(pos) if pos.is_checkmate() => {
                s.show(Some(EvalResult::checkmate(pos.side_to_move() == Color::Black)));
                s.calculating.set(false);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("cannot analyse node {}: {}", index, e);
                s.show(None);
                s.calculating.set(false);
                return;
            }
        }

        let cached = s.cache.borrow().get(&key).cloned();
        if let Some(hit) = cached {
            s.show(Some(hit));
            s.calculating.set(false);
            tokio::task::spawn_local(sweep(Rc::clone(s), generation, index));
            return;
        }

        let stored = s.tree.borrow().current().analysis.clone();
        if let Some(result) = stored {
            s.show(Some(result.clone()));
            s.calculating.set(false);
            s.cache.borrow_mut().put(key, result);
            return;
        }

        s.show(None);
        if s.gate.is_tripped() {
            s.calculating.set(false);
            return;
        }
        s.calculating.set(true);
        tokio::task::spawn_local(foreground(Rc::clone(s), generation, index, fen));
    }
}

async fn foreground<C: EvalClient>(s: Rc<Shared<C>>, generation: u64, index: usize, fen: String) {
    sleep(s.config.debounce()).await;
    if s.is_stale(generation) {
        debug!("skipping superseded request for {}", fen);
        return;
    }
    if s.gate.is_tripped() {
        s.calculating.set(false);
        return;
    }
    let settings = s.settings.borrow().clone();
    let outcome = s.client.evaluate(&fen, &settings).await;
    // the usage limit holds for every generation, stale or not
    let raw = match outcome {
        EvalOutcome::Ready(raw) if !raw.is_usage_limit() => Some(raw),
        EvalOutcome::Ready(_) | EvalOutcome::UsageLimit => {
            warn!("evaluation usage limit reached; analysis suspended");
            s.gate.trip();
            None
        }
        EvalOutcome::Unavailable => {
            warn!("no evaluation available for {}", fen);
            None
        }
    };
    if s.is_stale(generation) {
        debug!("discarding stale evaluation for {}", fen);
        return;
    }
    s.calculating.set(false);
    let Some(raw) = raw else { return };
    let Some(result) = raw.format() else {
        debug!("evaluation for {} carried no best move", fen);
        return;
    };
    s.show(Some(result.clone()));
    s.cache.borrow_mut().put_fen(&fen, result.clone());
    s.attach(index, &fen, result);
    sweep(s, generation, index).await;
}

async fn sweep<C: EvalClient>(s: Rc<Shared<C>>, generation: u64, center: usize) {
    if s.gate.is_tripped() { return; }
    let targets: Vec<(usize, String)> = {
        let tree = s.tree.borrow();
        let cache = s.cache.borrow();
        sweep_order(center, tree.len(), s.config.sweep_radius)
            .into_iter()
            .filter_map(|i| tree.node(i).map(|n| (i, n.fen.clone())))
            .filter(|(_, fen)| !cache.contains(&normalize(fen)))
            .collect()
    };
    if targets.is_empty() { return; }
    debug!("sweep from node {}: {} targets", center, targets.len());

    for (i, fen) in targets {
        if s.is_stale(generation) { return; }
        sleep(s.config.sweep_pacing()).await;
        if s.is_stale(generation) || s.gate.is_tripped() { return; }
        let settings = s.settings.borrow().clone();
        let raw = match s.client.evaluate(&fen, &settings).await {
            EvalOutcome::Ready(raw) if !raw.is_usage_limit() => raw,
            EvalOutcome::Ready(_) | EvalOutcome::UsageLimit => {
                warn!("evaluation usage limit reached during sweep");
                s.gate.trip();
                return;
            }
            EvalOutcome::Unavailable => {
                warn!("sweep: no evaluation available for node {}", i);
                continue;
            }
        };
        if s.is_stale(generation) { return; }
        if let Some(result) = raw.format() {
            s.cache.borrow_mut().put_fen(&fen, result.clone());
            s.tree.borrow_mut().attach(i, &fen, result);
        }
    }
}
