//! Position loading and push/pop tests.

use crate::board::{Game, LoadError, Move, MoveError, Role, Square};

fn find_move(game: &Game, uci: &str) -> shakmaty::Move {
    let wanted: Move = uci.parse().unwrap();
    *game
        .legal_moves()
        .iter()
        .find(|&&m| wanted.matches(m))
        .expect("Expected move not found")
}

#[test]
fn test_start_position() {
    let game = Game::new();
    assert!(game.white_to_move());
    assert_eq!(game.move_number(), 1);
    assert_eq!(game.legal_moves().len(), 20);
    assert_eq!(
        game.to_fen(),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    );
    assert!(!game.tracks_history());
}

#[test]
fn test_from_fen_rejects_garbage() {
    let err = Game::from_fen("not a fen").unwrap_err();
    assert!(matches!(err, LoadError::InvalidFen { .. }));
}

#[test]
fn test_from_fen_rejects_impossible_position() {
    // Side not to move is in check.
    let err = Game::from_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1").unwrap_err();
    assert!(matches!(err, LoadError::InvalidPosition { .. }));
}

#[test]
fn test_push_pop_restores_position() {
    let mut game =
        Game::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    let fen = game.to_fen();
    let hash = game.hash();

    let en_passant = find_move(&game, "e5f6");
    game.push(en_passant);
    assert_ne!(game.hash(), hash);
    assert_eq!(game.ply_count(), 1);

    assert!(game.pop());
    assert_eq!(game.to_fen(), fen);
    assert_eq!(game.hash(), hash);
    assert!(!game.pop());
}

#[test]
fn test_play_promotion() {
    let mut game = Game::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    game.play(Move::new(Square::A7, Square::A8, Some(Role::Knight)))
        .unwrap();
    assert_eq!(game.to_fen(), "N7/8/8/8/8/8/8/K1k5 b - - 0 1");
}

#[test]
fn test_play_castle_as_king_step() {
    let mut game =
        Game::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    game.play("e1g1".parse().unwrap()).unwrap();
    assert_eq!(
        game.to_fen(),
        "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R4RK1 b kq - 1 1"
    );
}

#[test]
fn test_play_illegal_move() {
    let mut game = Game::new();
    let err = game.play("e2e5".parse().unwrap()).unwrap_err();
    assert_eq!(
        err,
        MoveError::Illegal {
            notation: "e2e5".to_string()
        }
    );
    assert_eq!(game.ply_count(), 0);
}

#[test]
fn test_legal_moves_from_square() {
    let game = Game::new();
    let knight_moves = game.legal_moves_from(Square::G1);
    assert_eq!(knight_moves.len(), 2);
    assert!(game.legal_moves_from(Square::E4).is_empty());
}

#[test]
fn test_from_pgn_plays_history() {
    let game = Game::from_pgn("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *").unwrap();
    assert!(game.tracks_history());
    assert_eq!(game.ply_count(), 6);
    assert_eq!(game.move_number(), 4);
    assert_eq!(
        game.to_fen(),
        "r1bqkbnr/1ppp1ppp/p1n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4"
    );
}

#[test]
fn test_from_pgn_with_fen_tag() {
    let pgn = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\"]\n\n1. e4 Kd7 *";
    let game = Game::from_pgn(pgn).unwrap();
    assert_eq!(game.to_fen(), "8/3k4/8/8/4P3/8/8/4K3 w - - 1 2");
}

#[test]
fn test_from_pgn_illegal_san() {
    let err = Game::from_pgn("1. e4 e5 2. Ke3").unwrap_err();
    assert_eq!(
        err,
        LoadError::IllegalSan {
            san: "Ke3".to_string(),
            ply: 2
        }
    );
}

#[test]
fn test_from_pgn_invalid_san() {
    let err = Game::from_pgn("1. e4 xx9").unwrap_err();
    assert!(matches!(err, LoadError::InvalidSan { ply: 1, .. }));
}
