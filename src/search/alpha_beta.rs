use std::time::Instant;

use shakmaty::{Chess, Move, Position};
use tracing::{info, info_span};

use super::move_ordering::{HistoryBoard, MoveOrderer};
use super::tt::{ScoreBound, TranspositionEntry, TranspositionTable};
use super::{SearchConfig, SearchError, SearchLimits, SearchResult, SearchStats};
use crate::consts::{INF, MAX_DEPTH, NULL_MOVE_REDUCTION, NUM_SIDES};
use crate::controller::MoveController;
use crate::evaluation::Evaluator;
use crate::zobrist::side_index;

type HistoryTable = [HistoryBoard; NUM_SIDES];
type KillerTable = [[[Option<Move>; 2]; MAX_DEPTH + 1]; NUM_SIDES];

fn empty_killers() -> KillerTable {
    std::array::from_fn(|_| std::array::from_fn(|_| [None, None]))
}

/// Iterative-deepening negamax searcher with a transposition table,
/// null-move pruning, and heuristic move ordering.
///
/// The transposition table and the history/butterfly tables persist across
/// `find_best_move` calls so consecutive searches of a game keep their
/// accumulated knowledge. Killers are per-depth refutations of the current
/// search only and are cleared at the start of every top-level search.
pub struct Engine {
    evaluator: Box<dyn Evaluator>,
    config: SearchConfig,
    tt: TranspositionTable,
    history: Box<HistoryTable>,
    butterfly: Box<HistoryTable>,
    killers: Box<KillerTable>,
    nodes_searched: u64,
    start_time: Instant,
    stats: SearchStats,
}

impl Engine {
    pub fn new(evaluator: Box<dyn Evaluator>) -> Self {
        Self::with_config(evaluator, SearchConfig::default())
    }

    pub fn with_config(evaluator: Box<dyn Evaluator>, config: SearchConfig) -> Self {
        Self {
            evaluator,
            config,
            tt: TranspositionTable::new(config.hash_size_mb),
            history: Box::new([[[0; 64]; 64]; NUM_SIDES]),
            butterfly: Box::new([[[0; 64]; 64]; NUM_SIDES]),
            killers: Box::new(empty_killers()),
            nodes_searched: 0,
            start_time: Instant::now(),
            stats: SearchStats::default(),
        }
    }

    /// Forgets everything learned so far: transposition table, history,
    /// butterfly, killers, and counters.
    pub fn reset(&mut self) {
        self.tt.clear();
        *self.history = [[[0; 64]; 64]; NUM_SIDES];
        *self.butterfly = [[[0; 64]; 64]; NUM_SIDES];
        *self.killers = empty_killers();
        self.nodes_searched = 0;
        self.stats = SearchStats::default();
    }

    /// Counters from the most recent search.
    pub fn diagnostics(&self) -> &SearchStats {
        &self.stats
    }

    pub fn evaluator_name(&self) -> &str {
        self.evaluator.name()
    }

    /// Runs iterative deepening on `position` until the depth or time
    /// budget is spent. The time budget is checked only between depth
    /// passes; a pass that has started always runs to completion, so the
    /// reported move is always the result of a full-width search.
    ///
    /// The position is borrowed mutably for make/unmake during the search
    /// and is returned to its original state before this returns.
    pub fn find_best_move(
        &mut self,
        position: &mut Chess,
        limits: SearchLimits,
    ) -> Result<SearchResult, SearchError> {
        if position.is_game_over() {
            return Err(SearchError::GameAlreadyOver);
        }

        let span = info_span!("search_root");
        let _guard = span.enter();

        self.nodes_searched = 0;
        self.stats = SearchStats::default();
        self.killers
            .iter_mut()
            .for_each(|side| side.fill([None, None]));
        self.start_time = Instant::now();

        let max_depth = limits.max_depth.unwrap_or(MAX_DEPTH as u8).min(MAX_DEPTH as u8);
        let mut ctrl = MoveController::new(position);

        let mut best_move = None;
        let mut best_score = 0;
        let mut completed_depth = 0;

        for depth in 1..=max_depth {
            let (score, mv) = self.negamax(&mut ctrl, -INF, INF, depth, true)?;
            best_move = mv;
            best_score = score;
            completed_depth = depth;

            if self.config.emit_info {
                info!(
                    depth,
                    score,
                    nodes = self.nodes_searched,
                    elapsed_ms = self.start_time.elapsed().as_millis() as u64,
                    "completed depth"
                );
            }

            if let Some(max_time) = limits.max_time
                && self.start_time.elapsed() > max_time
            {
                break;
            }
        }

        self.stats.nodes_searched = self.nodes_searched;
        self.stats.depth_reached = completed_depth;
        self.stats.time_elapsed = self.start_time.elapsed();
        self.stats.hash_full = self.tt.hash_full();
        self.stats.calculate_nps();

        Ok(SearchResult {
            best_move,
            score: best_score,
            depth: completed_depth,
            nodes_searched: self.nodes_searched,
            time_taken: self.start_time.elapsed(),
        })
    }

    fn negamax(
        &mut self,
        ctrl: &mut MoveController,
        mut alpha: i32,
        mut beta: i32,
        depth: u8,
        allow_null: bool,
    ) -> Result<(i32, Option<Move>), SearchError> {
        self.nodes_searched += 1;
        let alpha_orig = alpha;
        let hash = ctrl.hash();

        self.stats.tt_probes += 1;
        let mut hash_move = None;
        if let Some(entry) = self.tt.probe(hash) {
            self.stats.tt_hits += 1;
            // Only an exact entry is trusted for ordering; bound entries
            // may carry a move from a partial, cut-off search of the node.
            if entry.bound == ScoreBound::Exact {
                hash_move = entry.best_move.clone();
            }
            if entry.depth >= depth {
                match entry.bound {
                    ScoreBound::Exact => {
                        self.stats.tt_cutoffs += 1;
                        return Ok((entry.score, entry.best_move));
                    }
                    ScoreBound::Lower => alpha = alpha.max(entry.score),
                    ScoreBound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    self.stats.tt_cutoffs += 1;
                    return Ok((entry.score, entry.best_move));
                }
            }
        }

        if depth == 0 || ctrl.position().is_game_over() {
            // Subtracting the remaining depth makes shallower wins (and
            // deeper losses) preferable, so the engine converges on the
            // fastest mate instead of shuffling.
            let score = self.evaluator.evaluate(ctrl.position()) - i32::from(depth);
            return Ok((score, None));
        }

        if self.config.enable_nmp && allow_null && !ctrl.position().is_check() {
            self.stats.null_move_attempts += 1;
            ctrl.make_null_move()?;
            let (reply, _) = self.negamax(
                ctrl,
                -beta,
                -beta + 1,
                depth.saturating_sub(NULL_MOVE_REDUCTION),
                false,
            )?;
            let score = -reply;
            ctrl.unmake_null_move()?;
            if score >= beta {
                self.stats.null_move_cutoffs += 1;
                return Ok((score, None));
            }
        }

        let mut moves = ctrl.position().legal_moves();
        let side = side_index(ctrl.position().turn());
        {
            let killers = self.killers[side][depth as usize].clone();
            let orderer = MoveOrderer::new(
                hash_move,
                &killers,
                &self.history[side],
                &self.butterfly[side],
            );
            orderer.order(&mut moves);
        }

        let mut best_move = None;
        let mut best_score = -INF;

        for mv in &moves {
            ctrl.make_move(mv);
            let (reply, _) = self.negamax(ctrl, -beta, -alpha, depth - 1, true)?;
            let score = -reply;
            ctrl.unmake_move()?;

            if score > best_score {
                best_score = score;
                best_move = Some(mv.clone());
            }
            alpha = alpha.max(best_score);

            let quiet = mv.capture().is_none();
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if quiet && let Some(from) = mv.from() {
                    let d = u64::from(depth);
                    self.history[side][from as usize][mv.to() as usize] += d * d;
                    let slot = &mut self.killers[side][depth as usize];
                    if slot[0].as_ref() != Some(mv) {
                        slot[1] = slot[0].take();
                        slot[0] = Some(mv.clone());
                    }
                }
                break;
            } else if quiet && let Some(from) = mv.from() {
                self.butterfly[side][from as usize][mv.to() as usize] += u64::from(depth);
            }
        }

        debug_assert!(
            best_move.is_some(),
            "a node with legal moves must settle on a move"
        );

        let bound = if best_score <= alpha_orig {
            ScoreBound::Upper
        } else if best_score >= beta {
            ScoreBound::Lower
        } else {
            ScoreBound::Exact
        };
        self.tt.store(TranspositionEntry {
            hash,
            depth,
            score: best_score,
            bound,
            best_move: best_move.clone(),
        });

        Ok((best_score, best_move))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Box::new(crate::evaluation::MaterialEvaluator))
    }
}
