use piereview::cache::EvalCache;
use piereview::eval::{EvalResult, Score};
use piereview::review::{annotate_move, game_over, Annotation, GameOutcome};
use piereview::tree::MoveTree;
use cozy_chess::Color;

fn eval(score: Score) -> EvalResult {
    EvalResult { score, depth: 18, best_move: Some("e2e4".into()), text: None, continuation: vec![], variants: vec![] }
}

#[test]
fn detects_terminal_positions() {
    let mut tree = MoveTree::new();
    tree.play_sequence(["f3", "e5", "g4", "Qh4#"]);
    assert_eq!(game_over(&tree), Some(GameOutcome::Checkmate { winner: Color::Black }));
    tree.jump_to(2);
    assert_eq!(game_over(&tree), None);

    let stalemate = MoveTree::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(game_over(&stalemate), Some(GameOutcome::Stalemate));

    let bare = MoveTree::from_fen("8/8/4k3/8/8/3NK3/8/8 w - - 0 1").unwrap();
    assert_eq!(game_over(&bare), Some(GameOutcome::InsufficientMaterial));

    let fifty = MoveTree::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 100 80").unwrap();
    assert_eq!(game_over(&fifty), Some(GameOutcome::FiftyMoveRule));
}

#[test]
fn threefold_counts_the_line_up_to_the_viewed_node() {
    let mut tree = MoveTree::new();
    let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"];
    assert_eq!(tree.play_sequence(shuffle), 8);
    assert_eq!(game_over(&tree), Some(GameOutcome::ThreefoldRepetition));
    assert_eq!(game_over(&tree).unwrap().to_string(), "Draw (Threefold Repetition)");
    tree.jump_to(4);
    assert_eq!(game_over(&tree), None);
}

#[test]
fn annotation_follows_the_mover() {
    let mut tree = MoveTree::new();
    tree.play_sequence(["e4", "e5"]);
    let mut cache = EvalCache::new(10);
    cache.put_fen(&tree.node(0).unwrap().fen, eval(Score::Centipawns(20)));
    cache.put_fen(&tree.node(1).unwrap().fen, eval(Score::Centipawns(30)));
    cache.put_fen(&tree.node(2).unwrap().fen, eval(Score::Centipawns(280)));

    assert_eq!(annotate_move(&cache, &tree, 0), None);
    assert_eq!(annotate_move(&cache, &tree, 1), Some(Annotation::Interesting));
    // black's move let White gain 2.5 pawns
    assert_eq!(annotate_move(&cache, &tree, 2), Some(Annotation::Blunder));

    cache.put_fen(&tree.node(2).unwrap().fen, eval(Score::Mate(3)));
    assert_eq!(annotate_move(&cache, &tree, 2), None);
}
