/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Bitboard, Game, PieceKind, Square};

/// Count the move paths of length `depth` from the current position of `game`.
///
/// Each path is played on a copy made with [`Game::with_move_made`], so `game` itself,
/// including its redo branch, is never touched. A promoting pawn counts once per promotion piece.
///
/// # Example
/// ```
/// # use chessmap::{perft, Game, GameConfig};
/// let game = Game::new(GameConfig::default());
/// assert_eq!(perft(&game, 2), 400);
/// ```
#[inline(always)]
pub fn perft(game: &Game, depth: usize) -> u64 {
    perft_generic::<false>(game, depth)
}

/// Like [`perft`], but prints the number of paths that follow each root move.
#[inline(always)]
pub fn splitperft(game: &Game, depth: usize) -> u64 {
    perft_generic::<true>(game, depth)
}

/// If `SPLIT` is set, the node count below each root move is printed.
pub fn perft_generic<const SPLIT: bool>(game: &Game, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    children(game).into_iter().fold(0, |nodes, (from, to, promotion)| {
        let kind = promotion.unwrap_or(PieceKind::Queen);
        // Every child comes from the legal set, so it is always accepted.
        let Ok(child) = game.with_move_made(from, to, kind) else {
            return nodes;
        };
        let new_nodes = perft_generic::<false>(&child, depth - 1);

        if SPLIT {
            match promotion {
                Some(kind) => println!("{from}{to}={}\t{new_nodes}", kind.char()),
                None => println!("{from}{to}\t{new_nodes}"),
            }
        }

        nodes + new_nodes
    })
}

/// Legal moves for the side to move, one entry per promotion piece for promoting pawns.
fn children(game: &Game) -> Vec<(Square, Square, Option<PieceKind>)> {
    let mut children = Vec::new();
    for (from, to) in game.legal_moves() {
        if is_promotion(game, from, to) {
            children.extend(
                PieceKind::all()
                    .into_iter()
                    .filter(PieceKind::is_promotion_target)
                    .map(|kind| (from, to, Some(kind))),
            );
        } else {
            children.push((from, to, None));
        }
    }
    children
}

fn is_promotion(game: &Game, from: Square, to: Square) -> bool {
    game.position()
        .placement()
        .piece_at(from)
        .is_some_and(|piece| piece.is_pawn() && Bitboard::eighth_rank(piece.color()).intersects(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameConfig, Piece, Position};

    #[test]
    fn test_perft_leaves_game_untouched() {
        let game = Game::new(GameConfig::default());
        assert_eq!(perft(&game, 3), 8_902);
        assert_eq!(game.position(), &Position::standard());
        assert_eq!(game.history().move_count(), 0);
        assert!(game.history().turns().is_empty());
    }

    #[test]
    fn test_perft_keeps_redo_branch() {
        let mut game = Game::new(GameConfig::default());
        game.set_move(Square::E2, Square::E4).unwrap();
        game.set_move(Square::E7, Square::E5).unwrap();
        game.prev().unwrap();
        let turns = game.history().turns().to_vec();

        assert_eq!(perft(&game, 2), 600);
        assert_eq!(splitperft(&game, 1), 20);
        assert_eq!(game.history().turns(), turns.as_slice());
        assert_eq!(game.history().move_count(), 1);

        game.next().unwrap();
        assert_eq!(
            game.history().most_recent().and_then(|turn| turn.as_move()),
            Some((Square::E7, Square::E5))
        );
    }

    #[test]
    fn test_promotions_are_expanded() {
        let mut game = Game::from_position(Position::new(), GameConfig::default());
        game.add_piece(Piece::WHITE_KING, Square::A1);
        game.add_piece(Piece::BLACK_KING, Square::H1);
        game.add_piece(Piece::WHITE_PAWN, Square::B7);
        game.set_active_player(crate::Color::White);

        // Three King moves plus four promotions.
        assert_eq!(perft(&game, 1), 7);
    }
}
