use piereview::board::{Position, START_FEN};
use piereview::cache::normalize;

#[test]
fn drops_move_counters() {
    assert_eq!(normalize(START_FEN).as_str(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
}

#[test]
fn counters_do_not_change_the_key() {
    let a = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let b = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 14 60";
    assert_eq!(normalize(a), normalize(b));
}

#[test]
fn identity_fields_do_change_the_key() {
    let white = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
    let black = "4k3/8/8/8/8/8/8/4K2R b K - 0 1";
    let no_castle = "4k3/8/8/8/8/8/8/4K2R w - - 0 1";
    assert_ne!(normalize(white), normalize(black));
    assert_ne!(normalize(white), normalize(no_castle));
}

#[test]
fn idempotent_on_canonical_descriptors() {
    for fen in [START_FEN, "8/4P3/8/8/8/8/k7/4K3 w - - 0 1", "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 17"] {
        let canonical = Position::from_fen(fen).unwrap().fen();
        let once = normalize(&canonical);
        assert_eq!(normalize(once.as_str()), once);
    }
}

#[test]
fn short_or_ragged_input_is_tolerated() {
    assert_eq!(normalize("8/8/8/8/8/8/8/8   w").as_str(), "8/8/8/8/8/8/8/8 w");
    assert_eq!(normalize("").as_str(), "");
}
