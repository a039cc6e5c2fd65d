/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use chessmap::{
    Bitboard, CastlingRights, ChessError, Color, Game, GameConfig, Piece, Placement, Position,
    Square, Wing,
};

fn game_of(pieces: &[(Piece, Square)], to_move: Color) -> Game {
    let mut placement = Placement::new();
    for &(piece, square) in pieces {
        placement.place(piece, square);
    }
    let mut game = Game::from_position(
        Position::from_parts(placement, CastlingRights::ALL),
        GameConfig::default(),
    );
    game.set_active_player(to_move);
    game
}

fn play(game: &mut Game, moves: &[(Square, Square)]) {
    for &(from, to) in moves {
        game.set_move(from, to).unwrap();
    }
}

#[test]
fn test_bitboards_stay_disjoint() {
    let mut game = Game::new(GameConfig::default());
    play(
        &mut game,
        &[
            (Square::E2, Square::E4),
            (Square::D7, Square::D5),
            (Square::E4, Square::D5),
            (Square::D8, Square::D5),
            (Square::B1, Square::C3),
            (Square::D5, Square::A2),
            (Square::A1, Square::A2),
        ],
    );
    assert!(game.position().placement().is_disjoint());
    assert_eq!(game.board().len(), 28);

    while game.has_prev() {
        game.prev().unwrap();
        assert!(game.position().placement().is_disjoint());
    }
    assert_eq!(game.position(), &Position::standard());
}

#[test]
fn test_square_notation_round_trip() {
    for square in Square::iter() {
        assert_eq!(square.to_string().parse::<Square>(), Ok(square));
    }
    assert!("e9".parse::<Square>().is_err());
    assert!("E4".parse::<Square>().is_err());
    assert!("e44".parse::<Square>().is_err());
    assert_eq!(
        Bitboard::new(0b11).to_square(),
        Err(ChessError::InvalidPosition("0x0000000000000003".to_string()))
    );
}

#[test]
fn test_undo_restores_everything() {
    let mut position = Position::standard();
    let mut turns = Vec::new();
    for (from, to) in [
        (Square::E2, Square::E4),
        (Square::E7, Square::E5),
        (Square::G1, Square::F3),
        (Square::B8, Square::C6),
        (Square::F1, Square::C4),
        (Square::G8, Square::F6),
    ] {
        let before = position;
        let turn = position.set_move(from, to).unwrap();
        let after = position;

        position.unmake(&turn);
        assert_eq!(position, before);
        position.redo(&turn).unwrap();
        assert_eq!(position, after);
        turns.push(turn);
    }

    let castle = position.set_move(Square::E1, Square::G1).unwrap();
    assert_eq!(position.placement().piece_at(Square::F1), Some(Piece::WHITE_ROOK));
    position.unmake(&castle);
    assert_eq!(position.castling_rights(), CastlingRights::ALL);
    assert_eq!(position.placement().piece_at(Square::H1), Some(Piece::WHITE_ROOK));

    for turn in turns.iter().rev() {
        position.unmake(turn);
    }
    assert_eq!(position, Position::standard());
}

#[test]
fn test_opening_move_counts() {
    let game = Game::new(GameConfig::default());
    assert_eq!(game.legal_moves().len(), 20);

    let black: u32 = game
        .position()
        .placement()
        .color(Color::Black)
        .into_iter()
        .map(|square| game.valid_moves(square).population() as u32)
        .sum();
    assert_eq!(black, 0);
}

#[test]
fn test_ruy_lopez_history() {
    let mut game = Game::new(GameConfig::default());
    play(
        &mut game,
        &[
            (Square::E2, Square::E4),
            (Square::E7, Square::E5),
            (Square::G1, Square::F3),
            (Square::B8, Square::C6),
            (Square::F1, Square::B5),
        ],
    );
    assert_eq!(game.history().move_count(), 5);
    assert!(game.history().is_blacks_turn());

    for _ in 0..3 {
        game.prev().unwrap();
    }
    assert_eq!(game.history().move_count(), 2);
    assert!(!game.history().is_blacks_turn());

    let mut expected = Game::new(GameConfig::default());
    play(
        &mut expected,
        &[(Square::E2, Square::E4), (Square::E7, Square::E5)],
    );
    assert_eq!(game.position(), expected.position());

    // A new move from the rewound position discards the old continuation.
    game.set_move(Square::D2, Square::D4).unwrap();
    assert_eq!(game.history().len(), 3);
    assert!(!game.has_next());
}

#[test]
fn test_en_passant_window() {
    let mut game = Game::new(GameConfig::default());
    play(
        &mut game,
        &[
            (Square::E2, Square::E4),
            (Square::A7, Square::A6),
            (Square::E4, Square::E5),
            (Square::D7, Square::D5),
        ],
    );
    assert!(game.valid_moves(Square::E5).intersects(Square::D6));

    // Capturing removes the bypassed pawn, and undo brings it back.
    game.set_move(Square::E5, Square::D6).unwrap();
    assert!(game.board().get(&Square::D5).is_none());
    game.prev().unwrap();
    assert_eq!(game.board().get(&Square::D5), Some(&Piece::BLACK_PAWN));

    // Any intervening move closes the window.
    play(
        &mut game,
        &[(Square::G1, Square::F3), (Square::H7, Square::H6)],
    );
    assert!(!game.valid_moves(Square::E5).intersects(Square::D6));
}

#[test]
fn test_castling_and_rook_capture() {
    let mut game = game_of(
        &[
            (Piece::WHITE_KING, Square::E1),
            (Piece::WHITE_ROOK, Square::A1),
            (Piece::WHITE_ROOK, Square::H1),
            (Piece::BLACK_KING, Square::E8),
            (Piece::BLACK_BISHOP, Square::B7),
        ],
        Color::Black,
    );
    let king = game.valid_moves(Square::E1);
    assert!(king.is_empty(), "White may not move on Black's turn");

    game.set_move(Square::B7, Square::H1).unwrap();
    let rights = game.position().castling_rights();
    assert!(!rights.get(Color::White, Wing::Kingside));
    assert!(rights.get(Color::White, Wing::Queenside));
    assert_eq!(game.position().placement().king(Color::White), Some(Square::E1));

    let king = game.valid_moves(Square::E1);
    assert!(king.intersects(Square::C1));
    assert!(!king.intersects(Square::G1));

    game.prev().unwrap();
    game.set_active_player(Color::White);
    let king = game.valid_moves(Square::E1);
    assert!(king.intersects(Square::C1));
    assert!(king.intersects(Square::G1));
}

#[test]
fn test_pinned_bishop() {
    let game = game_of(
        &[
            (Piece::WHITE_KING, Square::C1),
            (Piece::WHITE_BISHOP, Square::D2),
            (Piece::BLACK_QUEEN, Square::G5),
            (Piece::BLACK_KING, Square::H8),
        ],
        Color::White,
    );
    let moves = game.valid_moves(Square::D2);
    assert_eq!(
        moves.iter().collect::<Vec<_>>(),
        vec![Square::E3, Square::F4, Square::G5]
    );
    assert!(!moves.intersects(Square::C3));
}

#[test]
fn test_checkmate_and_stalemate() {
    let mate = game_of(
        &[
            (Piece::WHITE_KING, Square::G1),
            (Piece::WHITE_PAWN, Square::F2),
            (Piece::WHITE_PAWN, Square::G2),
            (Piece::WHITE_PAWN, Square::H2),
            (Piece::BLACK_ROOK, Square::A1),
            (Piece::BLACK_KING, Square::G8),
        ],
        Color::White,
    );
    assert!(mate.legal_moves().is_empty());
    assert!(mate.is_in_check(Color::White));
    assert_eq!(mate.winner(), Some(Color::Black));

    let stalemate = game_of(
        &[
            (Piece::WHITE_KING, Square::F7),
            (Piece::WHITE_QUEEN, Square::G6),
            (Piece::BLACK_KING, Square::H8),
        ],
        Color::Black,
    );
    assert!(stalemate.legal_moves().is_empty());
    assert!(!stalemate.is_in_check(Color::Black));
    assert_eq!(stalemate.winner(), Some(Color::White));
}
