use shakmaty::{Chess, Position};

use crate::consts::WIN_SCORE;

/// Static evaluation from the side-to-move's point of view.
pub trait Evaluator {
    fn evaluate(&self, position: &Chess) -> i32;
    fn name(&self) -> &str;
}

/// Plain material count in centipawns. Decided games score `WIN_SCORE`
/// for the winner and zero for draws, regardless of material.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialEvaluator;

/// Centipawn values indexed by role. Kings cancel out, so they carry none.
const PIECE_VALUES: [i32; 6] = [100, 300, 300, 500, 900, 0];

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, position: &Chess) -> i32 {
        if let Some(outcome) = position.outcome() {
            return match outcome.winner() {
                None => 0,
                Some(winner) if winner == position.turn() => WIN_SCORE,
                Some(_) => -WIN_SCORE,
            };
        }

        let board = position.board();
        let mut score = 0;
        for sq in board.occupied() {
            if let Some(piece) = board.piece_at(sq) {
                let value = PIECE_VALUES[piece.role as usize - 1];
                if piece.color == position.turn() {
                    score += value;
                } else {
                    score -= value;
                }
            }
        }
        score
    }

    fn name(&self) -> &str {
        "material"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::START_FEN;
    use shakmaty::{CastlingMode, fen::Fen};

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    #[test]
    fn startpos_is_balanced() {
        let pos = position(START_FEN);
        assert_eq!(MaterialEvaluator.evaluate(&pos), 0);
    }

    #[test]
    fn score_is_relative_to_side_to_move() {
        // White is up a rook.
        let white_to_move = position("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let black_to_move = position("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        assert_eq!(MaterialEvaluator.evaluate(&white_to_move), 500);
        assert_eq!(MaterialEvaluator.evaluate(&black_to_move), -500);
    }

    #[test]
    fn checkmate_scores_loss_for_side_to_move() {
        // Fool's mate: white to move and mated.
        let pos = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(pos.is_checkmate());
        assert_eq!(MaterialEvaluator.evaluate(&pos), -WIN_SCORE);
    }

    #[test]
    fn stalemate_scores_zero_despite_material() {
        // Black to move, stalemated, and down a queen.
        let pos = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(pos.is_stalemate());
        assert_eq!(MaterialEvaluator.evaluate(&pos), 0);
    }
}
