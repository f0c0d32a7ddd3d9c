use shakmaty::{Move, MoveList};

use crate::consts::NUM_SQUARES;

/// Exchange values used only to rank captures relative to each other.
/// The king's value pushes every capture made by the king into the
/// losing band.
const EXCHANGE_VALUES: [i64; 6] = [1, 3, 3, 5, 9, 10_000];

/// Fixed-point scale for history/butterfly ratios, so quiet moves keep
/// ordering resolution without floating point.
const HISTORY_SCALE: i64 = 1_000;

/// Score bands, highest first: hash move, winning/equal captures, killers,
/// then the quiet continuum where losing captures also land.
const HASH_MOVE_SCORE: i64 = 1 << 40;
const CAPTURE_OFFSET: i64 = 1 << 30;
const KILLER_SCORES: [i64; 2] = [1 << 29, (1 << 29) - 1];
const QUIET_CAP: i64 = (1 << 29) - 2;
const LOSING_CAPTURE_SCORE: i64 = 30 * HISTORY_SCALE;

pub type HistoryBoard = [[u64; NUM_SQUARES]; NUM_SQUARES];

/// Per-node move ordering policy. Built fresh at each node from the hash
/// move and the searcher's heuristic tables, then applied as one stable
/// sort so equal scores keep their generation order.
pub struct MoveOrderer<'a> {
    hash_move: Option<Move>,
    killers: &'a [Option<Move>; 2],
    history: &'a HistoryBoard,
    butterfly: &'a HistoryBoard,
}

impl<'a> MoveOrderer<'a> {
    pub fn new(
        hash_move: Option<Move>,
        killers: &'a [Option<Move>; 2],
        history: &'a HistoryBoard,
        butterfly: &'a HistoryBoard,
    ) -> Self {
        Self {
            hash_move,
            killers,
            history,
            butterfly,
        }
    }

    pub fn order(&self, moves: &mut MoveList) {
        moves.sort_by_key(|mv| std::cmp::Reverse(self.score(mv)));
    }

    fn score(&self, mv: &Move) -> i64 {
        if self.hash_move.as_ref() == Some(mv) {
            return HASH_MOVE_SCORE;
        }

        if let Some(victim) = mv.capture() {
            let gain = EXCHANGE_VALUES[victim as usize - 1]
                - EXCHANGE_VALUES[mv.role() as usize - 1];
            if gain >= 0 {
                return CAPTURE_OFFSET + (10 + gain) * 5;
            }
            // Losing captures drop into the quiet continuum.
            return LOSING_CAPTURE_SCORE;
        }

        if self.killers[0].as_ref() == Some(mv) {
            return KILLER_SCORES[0];
        }
        if self.killers[1].as_ref() == Some(mv) {
            return KILLER_SCORES[1];
        }

        self.quiet_score(mv)
    }

    fn quiet_score(&self, mv: &Move) -> i64 {
        let Some(from) = mv.from() else {
            return 0;
        };
        let hits = self.history[from as usize][mv.to() as usize];
        let tried = self.butterfly[from as usize][mv.to() as usize];
        if tried == 0 {
            return 0;
        }
        (((hits as i64) * HISTORY_SCALE) / tried as i64).min(QUIET_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{CastlingMode, Chess, Position, fen::Fen, uci::UciMove};

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    fn find_move(pos: &Chess, uci: &str) -> Move {
        pos.legal_moves()
            .into_iter()
            .find(|m| m.to_uci(CastlingMode::Standard).to_string() == uci)
            .unwrap_or_else(|| panic!("no move {uci}"))
    }

    const EMPTY: HistoryBoard = [[0; NUM_SQUARES]; NUM_SQUARES];
    const NO_KILLERS: [Option<Move>; 2] = [None, None];

    fn parse(pos: &Chess, uci: &str) -> Move {
        uci.parse::<UciMove>().unwrap().to_move(pos).unwrap()
    }

    #[test]
    fn hash_move_sorts_first() {
        let pos = position(crate::consts::KIWIPETE);
        let mut moves = pos.legal_moves();
        let hash_move = moves.last().unwrap().clone();
        let orderer = MoveOrderer::new(Some(hash_move.clone()), &NO_KILLERS, &EMPTY, &EMPTY);
        orderer.order(&mut moves);
        assert_eq!(moves[0], hash_move);
    }

    #[test]
    fn winning_captures_outrank_quiets_and_losing_captures() {
        let pos = position("4k3/8/2r5/3q4/4P3/2Q5/8/4K3 w - - 0 1");
        let pawn_takes_queen = find_move(&pos, "e4d5");
        // Queen takes a rook: loses material, drops into the quiet band.
        let queen_takes_rook = find_move(&pos, "c3c6");
        let quiet = find_move(&pos, "e1f1");

        let orderer = MoveOrderer::new(None, &NO_KILLERS, &EMPTY, &EMPTY);
        let mut moves = pos.legal_moves();
        orderer.order(&mut moves);

        let idx = |m: &Move| moves.iter().position(|x| x == m).unwrap();
        assert!(idx(&pawn_takes_queen) < idx(&queen_takes_rook));
        // Losing capture still beats an untried quiet move.
        assert!(idx(&queen_takes_rook) < idx(&quiet));
    }

    #[test]
    fn capture_rank_follows_victim_minus_attacker() {
        // Pawn takes queen must outrank queen takes pawn.
        let pos = position("4k3/8/8/3q4/4P3/8/8/3QK3 w - - 0 1");
        let pawn_takes_queen = find_move(&pos, "e4d5");
        let queen_takes_queen = find_move(&pos, "d1d5");

        let orderer = MoveOrderer::new(None, &NO_KILLERS, &EMPTY, &EMPTY);
        let mut moves = pos.legal_moves();
        orderer.order(&mut moves);

        let idx = |m: &Move| moves.iter().position(|x| x == m).unwrap();
        assert!(idx(&pawn_takes_queen) < idx(&queen_takes_queen));
    }

    #[test]
    fn killers_lead_the_quiet_band_most_recent_first() {
        let pos = position(crate::consts::START_FEN);
        let recent = parse(&pos, "g1f3");
        let older = parse(&pos, "b1c3");
        let killers = [Some(recent.clone()), Some(older.clone())];

        let orderer = MoveOrderer::new(None, &killers, &EMPTY, &EMPTY);
        let mut moves = pos.legal_moves();
        orderer.order(&mut moves);

        assert_eq!(moves[0], recent);
        assert_eq!(moves[1], older);
    }

    #[test]
    fn history_ratio_orders_quiets() {
        let pos = position(crate::consts::START_FEN);
        let strong = parse(&pos, "e2e4");
        let weak = parse(&pos, "a2a3");

        let mut history = EMPTY;
        let mut butterfly = EMPTY;
        // strong: 9 cutoffs out of 10 tries; weak: 1 out of 10.
        history[strong.from().unwrap() as usize][strong.to() as usize] = 9;
        butterfly[strong.from().unwrap() as usize][strong.to() as usize] = 10;
        history[weak.from().unwrap() as usize][weak.to() as usize] = 1;
        butterfly[weak.from().unwrap() as usize][weak.to() as usize] = 10;

        let orderer = MoveOrderer::new(None, &NO_KILLERS, &history, &butterfly);
        let mut moves = pos.legal_moves();
        orderer.order(&mut moves);

        let idx = |m: &Move| moves.iter().position(|x| x == m).unwrap();
        assert!(idx(&strong) < idx(&weak));
    }

    #[test]
    fn untried_quiets_tie_and_keep_generation_order() {
        let pos = position(crate::consts::START_FEN);
        let moves_before = pos.legal_moves();
        let mut moves = moves_before.clone();
        let orderer = MoveOrderer::new(None, &NO_KILLERS, &EMPTY, &EMPTY);
        orderer.order(&mut moves);
        // Startpos has no captures, killers, or history: everything ties
        // at zero and the stable sort must not reorder anything.
        assert_eq!(moves, moves_before);
    }
}
