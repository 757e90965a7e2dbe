use pretty_assertions::assert_eq;
use piereview::board::{MoveInput, START_FEN};
use piereview::tree::{Applied, MoveTree};

fn sans(tree: &MoveTree) -> Vec<String> {
    tree.line().iter().filter_map(|n| n.mv.as_ref().map(|m| m.san.clone())).collect()
}

#[test]
fn append_from_start() {
    let mut tree = MoveTree::new();
    assert_eq!(tree.root_fen(), START_FEN);
    assert_eq!(tree.apply_move(&"e2e4".into()), Some(Applied::Appended));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.index(), 1);
    let fen = &tree.current().fen;
    assert!(fen.starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b "), "{}", fen);
}

#[test]
fn diverging_move_stores_old_tail() {
    let mut tree = MoveTree::new();
    tree.apply_move(&"e2e4".into());
    assert!(tree.jump_to(0));
    assert_eq!(tree.apply_move(&"d2d4".into()), Some(Applied::Forked));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.index(), 1);
    assert_eq!(sans(&tree), vec!["d4"]);
    let root = tree.node(0).unwrap();
    assert_eq!(root.variations.len(), 1);
    assert_eq!(root.variations[0].len(), 1);
    assert_eq!(root.variations[0][0].mv.as_ref().unwrap().san, "e4");
}

#[test]
fn replaying_known_move_does_not_fork() {
    let mut tree = MoveTree::new();
    assert_eq!(tree.play_sequence(["e4", "e5", "Nf3"]), 3);
    tree.jump_to(1);
    assert_eq!(tree.apply_move(&"e7e5".into()), Some(Applied::Advanced));
    assert_eq!(tree.index(), 2);
    assert_eq!(tree.len(), 4);
    assert!(tree.line().iter().all(|n| n.variations.is_empty()));
}

#[test]
fn illegal_move_changes_nothing() {
    let mut tree = MoveTree::new();
    tree.apply_move(&"e2e4".into());
    let before = tree.clone();
    assert_eq!(tree.apply_move(&"e2e5".into()), None);
    assert_eq!(tree.apply_move(&MoveInput::San("Ke2".into())), None);
    assert_eq!(tree, before);
}

#[test]
fn play_sequence_stops_at_first_illegal_move() {
    let mut tree = MoveTree::new();
    assert_eq!(tree.play_sequence(["e4", "e5", "Qh9", "Nf3"]), 2);
    assert_eq!(tree.len(), 3);
    assert_eq!(sans(&tree), vec!["e4", "e5"]);
}

#[test]
fn swap_variation_is_its_own_inverse() {
    let mut tree = MoveTree::new();
    tree.play_sequence(["e4", "e5", "Nf3"]);
    tree.jump_to(1);
    tree.play_sequence(["c5", "Nf3"]);
    let original = tree.clone();
    assert_eq!(sans(&tree), vec!["e4", "c5", "Nf3"]);

    assert!(tree.swap_variation(1, 0));
    assert_eq!(sans(&tree), vec!["e4", "e5", "Nf3"]);
    assert_eq!(tree.index(), 2);
    assert_eq!(tree.node(1).unwrap().variations.len(), 1);

    assert!(tree.swap_variation(1, 0));
    assert_eq!(tree.line(), original.line());
}

#[test]
fn swap_without_variation_is_a_no_op() {
    let mut tree = MoveTree::new();
    tree.play_sequence(["e4", "e5"]);
    let before = tree.clone();
    assert!(!tree.swap_variation(0, 0));
    assert!(!tree.swap_variation(9, 0));
    assert_eq!(tree, before);
}

#[test]
fn swap_into_empty_tail_promotes_variation() {
    let mut tree = MoveTree::new();
    tree.apply_move(&"e2e4".into());
    tree.jump_to(0);
    tree.apply_move(&"d2d4".into());
    // drop the d4 tail so the root has a variation but nothing after it
    let line = tree.line()[..1].to_vec();
    let mut tree = MoveTree::from_line(line, 0).unwrap();
    assert!(tree.swap_variation(0, 0));
    assert_eq!(sans(&tree), vec!["e4"]);
    assert!(tree.node(0).unwrap().variations.is_empty());
}

#[test]
fn castling_and_promotion_records() {
    let mut tree = MoveTree::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    tree.apply_move(&"e1g1".into());
    let castle = tree.current().mv.clone().unwrap();
    assert_eq!((castle.from.as_str(), castle.to.as_str(), castle.san.as_str()), ("e1", "g1", "O-O"));
    tree.apply_move(&"O-O-O".into());
    assert_eq!(tree.current().mv.as_ref().unwrap().uci(), "e8c8");

    let mut tree = MoveTree::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    tree.apply_move(&"e7e8".into());
    let promo = tree.current().mv.clone().unwrap();
    assert_eq!(promo.promotion, Some('q'));
    assert_eq!(promo.san, "e8=Q");
}

#[test]
fn invalid_fen_is_an_error() {
    assert!(MoveTree::from_fen("not a fen").is_err());
}

#[test]
fn tree_survives_json() {
    let mut tree = MoveTree::new();
    tree.play_sequence(["e4", "e5"]);
    tree.jump_to(0);
    tree.apply_move(&"d4".into());
    let json = serde_json::to_string(tree.line()).unwrap();
    let line = serde_json::from_str(&json).unwrap();
    let back = MoveTree::from_line(line, tree.index()).unwrap();
    assert_eq!(back, tree);
}
