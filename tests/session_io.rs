use pretty_assertions::assert_eq;
use std::path::PathBuf;

use piereview::board::START_FEN;
use piereview::error::ReviewError;
use piereview::session::SessionBook;
use piereview::tree::MoveTree;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("piereview-sessions-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("games.json")
}

#[test]
fn missing_file_opens_with_one_fresh_session() {
    let path = scratch("fresh");
    let book = SessionBook::open(&path);
    assert_eq!(book.games().len(), 1);
    assert_eq!(book.games()[0].fen, START_FEN);
    assert_eq!(book.active_id(), Some(book.games()[0].id));
    assert!(path.exists());
}

#[test]
fn saved_game_reloads_at_its_last_node() {
    let path = scratch("reload");
    let mut tree = MoveTree::new();
    tree.play_sequence(["e4", "e5", "Nf3"]);
    tree.jump_to(1);
    tree.apply_move(&"c7c5".into());
    tree.jump_to(0);
    let id = {
        let mut book = SessionBook::open(&path);
        book.save_current(&tree)
    };

    let mut book = SessionBook::open(&path);
    assert_eq!(book.active_id(), Some(id));
    let saved = book.get(id).unwrap();
    assert_eq!(saved.fen, START_FEN);
    assert_eq!(saved.last_move, None);
    let restored = book.load(id).unwrap();
    assert_eq!(restored.line(), tree.line());
    assert_eq!(restored.index(), restored.last_index());
    assert_eq!(restored.node(1).unwrap().variations.len(), 1);
}

#[test]
fn new_game_is_prepended_and_active() {
    let mut book = SessionBook::in_memory();
    let first = book.active_id().unwrap();
    let second = book.new_game();
    assert_eq!(book.games().iter().map(|g| g.id).collect::<Vec<_>>(), vec![second, first]);
    assert_eq!(book.active_id(), Some(second));
}

#[test]
fn remove_and_unknown_ids() {
    let mut book = SessionBook::in_memory();
    let id = book.active_id().unwrap();
    assert!(book.remove(id));
    assert!(!book.remove(id));
    assert_eq!(book.active_id(), None);
    assert!(matches!(book.load(id), Err(ReviewError::UnknownSession(x)) if x == id));

    // with nothing active, saving starts a new session
    let new_id = book.save_current(&MoveTree::new());
    assert_eq!(book.active_id(), Some(new_id));
    assert_eq!(book.games().len(), 1);
}

#[test]
fn corrupt_file_is_replaced() {
    let path = scratch("corrupt");
    std::fs::write(&path, "[1, 2").unwrap();
    let book = SessionBook::open(&path);
    assert_eq!(book.games().len(), 1);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("last_active_id"));
}
