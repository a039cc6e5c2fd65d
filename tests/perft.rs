/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use chessmap::{
    perft, CastlingRights, Color, Game, GameConfig, Piece, PieceKind, Placement, Position, Square,
};

/// Builds a placement from the piece-placement field of a FEN string.
fn placement_from_rows(rows: &str) -> Placement {
    let mut placement = Placement::new();
    for (i, row) in rows.split('/').enumerate() {
        let rank = 7 - i;
        let mut file = 0;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
                continue;
            }
            let color = Color::from_bool(c.is_ascii_lowercase());
            let kind = PieceKind::from_char(c.to_ascii_uppercase()).unwrap();
            let square = Square::from_index(rank * 8 + file).unwrap();
            placement.place(Piece::new(color, kind), square);
            file += 1;
        }
    }
    placement
}

fn test_perft_nodes(rows: &str, castling: CastlingRights, depth: usize, expected: u64) {
    let position = Position::from_parts(placement_from_rows(rows), castling);
    let game = Game::from_position(position, GameConfig::default());
    let res = perft(&game, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on {rows}");
    assert_eq!(game.position(), &position);
}

#[cfg(test)]
mod standard_perft {
    use super::*;

    const ROWS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn test_rows_match_standard_placement() {
        assert_eq!(placement_from_rows(ROWS), Placement::standard());
    }

    #[test]
    fn test_perft_1() {
        test_perft_nodes(ROWS, CastlingRights::ALL, 1, 20);
    }

    #[test]
    fn test_perft_2() {
        test_perft_nodes(ROWS, CastlingRights::ALL, 2, 400);
    }

    #[test]
    fn test_perft_3() {
        test_perft_nodes(ROWS, CastlingRights::ALL, 3, 8_902);
    }
}

#[cfg(test)]
mod kiwipete_perft {
    use super::*;

    const ROWS: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R";

    #[test]
    fn test_perft_1() {
        test_perft_nodes(ROWS, CastlingRights::ALL, 1, 48);
    }

    #[test]
    fn test_perft_2() {
        test_perft_nodes(ROWS, CastlingRights::ALL, 2, 2_039);
    }
}

#[cfg(test)]
mod en_passant_perft {
    use super::*;

    // Includes an en passant capture that would expose the King along its rank.
    const ROWS: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8";

    #[test]
    fn test_perft_1() {
        test_perft_nodes(ROWS, CastlingRights::NONE, 1, 14);
    }

    #[test]
    fn test_perft_2() {
        test_perft_nodes(ROWS, CastlingRights::NONE, 2, 191);
    }

    #[test]
    fn test_perft_3() {
        test_perft_nodes(ROWS, CastlingRights::NONE, 3, 2_812);
    }
}
