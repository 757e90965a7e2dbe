//! Saved review sessions, newest first, persisted as one JSON document.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::board::{MoveRecord, START_FEN};
use crate::error::{ReviewError, Result};
use crate::tree::{MoveTree, TreeNode};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: u64,
    /// Position being viewed when the session was last saved.
    pub fen: String,
    #[serde(default)]
    pub history: Vec<TreeNode>,
    #[serde(default)]
    pub last_move: Option<MoveRecord>,
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl GameSession {
    fn fresh(id: u64) -> Self {
        Self {
            id,
            fen: START_FEN.to_string(),
            history: vec![TreeNode::root(START_FEN.to_string())],
            last_move: None,
            timestamp_ms: id,
        }
    }

    /// Tree positioned on the last node of the saved line.
    pub fn to_tree(&self) -> Result<MoveTree> {
        match MoveTree::from_line(self.history.clone(), usize::MAX) {
            Some(tree) => Ok(tree),
            None => MoveTree::from_fen(&self.fen),
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
struct BookFile {
    games: Vec<GameSession>,
    #[serde(default)]
    last_active_id: Option<u64>,
}

pub struct SessionBook {
    path: Option<PathBuf>,
    games: Vec<GameSession>,
    active: Option<u64>,
}

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

impl SessionBook {
    /// Book that is never written to disk.
    pub fn in_memory() -> Self {
        let mut book = Self { path: None, games: Vec::new(), active: None };
        book.new_game();
        book
    }

    /// Loads the book at `path`. A missing, unreadable or empty file gives a book
    /// with one fresh session, which is written back immediately.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let stored = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<BookFile>(&bytes).unwrap_or_else(|e| {
                warn!("ignoring corrupt session file {}: {}", path.display(), e);
                BookFile::default()
            }),
            Err(e) => {
                debug!("no session file at {}: {}", path.display(), e);
                BookFile::default()
            }
        };
        let mut book = Self { path: Some(path), games: stored.games, active: None };
        if book.games.is_empty() {
            book.new_game();
            return book;
        }
        book.active = stored
            .last_active_id
            .filter(|id| book.get(*id).is_some())
            .or_else(|| book.games.first().map(|g| g.id));
        book
    }

    pub fn games(&self) -> &[GameSession] { &self.games }
    pub fn active_id(&self) -> Option<u64> { self.active }
    pub fn get(&self, id: u64) -> Option<&GameSession> { self.games.iter().find(|g| g.id == id) }

    fn next_id(&self) -> u64 {
        let newest = self.games.iter().map(|g| g.id).max().unwrap_or(0);
        now_ms().max(newest + 1)
    }

    /// Prepends a start-position session and makes it active.
    pub fn new_game(&mut self) -> u64 {
        let id = self.next_id();
        self.games.insert(0, GameSession::fresh(id));
        self.active = Some(id);
        self.persist();
        id
    }

    /// Stores `tree` into the active session, creating one if none is active.
    pub fn save_current(&mut self, tree: &MoveTree) -> u64 {
        let now = now_ms();
        let fen = tree.current().fen.clone();
        let history = tree.line().to_vec();
        let last_move = tree.current().mv.clone();
        let id = match self.active.and_then(|id| self.games.iter_mut().find(|g| g.id == id)) {
            Some(game) => {
                game.fen = fen;
                game.history = history;
                game.last_move = last_move;
                game.timestamp_ms = now;
                game.id
            }
            None => {
                let id = self.next_id();
                self.games.insert(0, GameSession { id, fen, history, last_move, timestamp_ms: now });
                self.active = Some(id);
                id
            }
        };
        self.persist();
        id
    }

    /// Activates session `id` and rebuilds its tree.
    pub fn load(&mut self, id: u64) -> Result<MoveTree> {
        let tree = self.get(id).ok_or(ReviewError::UnknownSession(id))?.to_tree()?;
        self.active = Some(id);
        self.persist();
        Ok(tree)
    }

    /// Drops session `id`. Removing the active session leaves none active.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.games.len();
        self.games.retain(|g| g.id != id);
        if self.games.len() == before { return false; }
        if self.active == Some(id) { self.active = None; }
        self.persist();
        true
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };
        let file = BookFile { games: self.games.clone(), last_active_id: self.active };
        let written = serde_json::to_vec(&file)
            .map_err(ReviewError::from)
            .and_then(|bytes| fs::write(path, bytes).map_err(ReviewError::from));
        if let Err(e) = written {
            warn!("failed to save sessions to {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_stay_unique_within_a_millisecond() {
        let mut book = SessionBook::in_memory();
        let a = book.new_game();
        let b = book.new_game();
        assert!(b > a);
        assert_eq!(book.games()[0].id, b);
        assert_eq!(book.active_id(), Some(b));
    }

    #[test]
    fn session_without_history_uses_its_fen() {
        let fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
        let session = GameSession { id: 1, fen: fen.to_string(), history: Vec::new(), last_move: None, timestamp_ms: 0 };
        let tree = session.to_tree().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_fen(), fen);
    }
}
