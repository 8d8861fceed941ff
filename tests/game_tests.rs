use chess_rules::{
    move_gen::{attacks::is_attacked, legality::all_legal_moves},
    notation::NotationError,
    position::{Position, PositionError},
    Color, DrawReason, Game, GameError, GameStatus, PieceType, Square,
};

fn play(game: &mut Game, notations: &[&str]) {
    for notation in notations {
        game.apply_coordinate_move(notation).unwrap_or_else(|e| panic!("{} was rejected: {}", notation, e));
    }
}

#[test]
fn test_double_push_sets_en_passant_square() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    assert_eq!(game.current_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
}

#[test]
fn test_knight_move_increments_halfmove_clock() {
    let mut game = Game::new();
    play(&mut game, &["g1f3"]);
    assert_eq!(game.current_fen(), "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1");
}

#[test]
fn test_rook_round_trip_loses_castling_right() {
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut game, &["h1h2", "a8a7", "h2h1", "a7a8"]);
    assert_eq!(game.current_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w Qk - 4 3");

    assert_eq!(
        game.apply_move(Square::E1, Square::G1, None),
        Err(GameError::InvalidMove { from: Square::E1, to: Square::G1, promotion: None })
    );

    let result = game.apply_move(Square::E1, Square::C1, None).unwrap();
    assert!(result.mv.is_castling());
    assert_eq!(game.current_fen(), "r3k2r/8/8/8/8/8/8/2KR3R b k - 5 3");
}

#[test]
fn test_en_passant_only_right_after_the_double_push() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    let result = game.apply_move(Square::E5, Square::D6, None).unwrap();
    assert!(result.mv.is_en_passant());
    assert_eq!(result.captured, Some(chess_rules::Piece::BLACK_PAWN));
    assert_eq!(game.current_fen(), "rnbqkbnr/1pp1pppp/p2P4/8/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3");

    let mut game = Game::new();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "g1f3", "h7h6"]);
    assert!(matches!(game.apply_move(Square::E5, Square::D6, None), Err(GameError::InvalidMove { .. })));
}

#[test]
fn test_fifty_move_rule_ends_the_game() {
    let mut game = Game::from_fen("4k1n1/8/8/8/8/8/8/4K1N1 w - - 0 1").unwrap();
    let cycle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    for ply in 0..100 {
        let result = game.apply_coordinate_move(cycle[ply % 4]).unwrap();
        let expected = if ply == 99 { GameStatus::Draw(DrawReason::FiftyMoveRule) } else { GameStatus::Ongoing };
        assert_eq!(result.status, expected, "after ply {}", ply + 1);
    }
    assert_eq!(game.position().halfmove_clock(), 100);
    assert!(game.legal_moves(Square::G1).is_empty());

    assert_eq!(
        game.apply_coordinate_move("g1f3"),
        Err(GameError::IllegalOperationInTerminalState(GameStatus::Draw(DrawReason::FiftyMoveRule)))
    );

    assert!(game.undo());
    assert_eq!(game.status().result, GameStatus::Ongoing);
    assert_eq!(game.position().halfmove_clock(), 99);
}

#[test]
fn test_fools_mate() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4"]);
    let result = game.apply_coordinate_move("d8h4").unwrap();

    assert_eq!(result.status, GameStatus::Checkmate);
    assert!(game.status().in_check);
    assert!(!game.status().has_legal_moves);
    assert_eq!(game.status().checkers, vec![Square::H4]);
    assert!(matches!(game.apply_coordinate_move("a2a3"), Err(GameError::IllegalOperationInTerminalState(_))));

    assert!(game.undo());
    assert_eq!(game.status().result, GameStatus::Ongoing);
    assert!(game.status().checkers.is_empty());
    assert_eq!(game.apply_coordinate_move("b8c6").unwrap().status, GameStatus::Ongoing);
}

#[test]
fn test_stalemate() {
    let mut game = Game::from_fen("7k/8/5QK1/8/8/8/8/8 w - - 0 1").unwrap();
    let result = game.apply_coordinate_move("f6f7").unwrap();
    assert_eq!(result.status, GameStatus::Stalemate);
    assert!(!game.status().in_check);
}

#[test]
fn test_promotion_must_be_explicit() {
    let mut game = Game::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();

    assert!(matches!(game.apply_move(Square::A7, Square::A8, None), Err(GameError::InvalidMove { .. })));
    assert!(matches!(
        game.apply_move(Square::A7, Square::A8, Some(PieceType::King)),
        Err(GameError::InvalidMove { .. })
    ));
    assert_eq!(
        game.apply_coordinate_move("a7a8k"),
        Err(GameError::InvalidNotation(NotationError::InvalidPromotionPiece(PieceType::King)))
    );

    let result = game.apply_move(Square::A7, Square::A8, Some(PieceType::Queen)).unwrap();
    assert_eq!(result.status, GameStatus::Check);
    assert_eq!(game.current_fen(), "Q7/8/8/8/8/8/8/k6K b - - 0 1");
}

#[test]
fn test_rejected_fen_leaves_game_unchanged() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    let before = game.current_fen();

    assert!(matches!(game.load_fen("not a fen"), Err(GameError::MalformedFen(_))));
    assert_eq!(
        game.load_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
        Err(GameError::CorruptPosition(PositionError::MissingKing(Color::Black)))
    );

    assert_eq!(
        game.load_fen("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1"),
        Err(GameError::CorruptPosition(PositionError::OpponentInCheck(Color::Black)))
    );

    assert_eq!(game.current_fen(), before);
    assert_eq!(game.history().len(), 1);
}

#[test]
fn test_castling_right_without_rook_is_dropped_on_load() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K1R1 w K - 0 1").unwrap();
    assert_eq!(game.current_fen(), "4k3/8/8/8/8/8/8/4K1R1 w - - 0 1");

    play(&mut game, &["g1h1", "e8d8"]);
    assert!(matches!(game.apply_move(Square::E1, Square::G1, None), Err(GameError::InvalidMove { .. })));
}

#[test]
fn test_large_clocks_are_accepted() {
    let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 70000 40000").unwrap();
    assert_eq!(game.status().result, GameStatus::Draw(DrawReason::FiftyMoveRule));
    assert_eq!(game.current_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 70000 40000");
}

#[test]
fn test_deterministic_playout_keeps_invariants() {
    let mut game = Game::new();

    for ply in 0..200 {
        if game.status().result.is_terminal() {
            break;
        }

        let moves = all_legal_moves(game.position());
        assert!(!moves.is_empty());
        let mv = moves[(ply * 7 + 3) % moves.len()];
        let mover = game.position().side_to_move();

        let result = game.apply_move(mv.from_square(), mv.to_square(), mv.promotion()).unwrap();

        let position = game.position();
        let king = position.king_square(mover).unwrap();
        assert!(!is_attacked(position, king, !mover), "{} left its king in check", mv);

        let fen = game.current_fen();
        assert_eq!(Position::new_from_fen(&fen).unwrap(), *position);

        let status = game.status();
        assert_eq!(result.status, status.result);
        assert_eq!(status.result == GameStatus::Checkmate, status.in_check && !status.has_legal_moves);
        assert_eq!(status.result == GameStatus::Stalemate, !status.in_check && !status.has_legal_moves);
        assert_eq!(game.history().len(), ply + 1);
    }
}
