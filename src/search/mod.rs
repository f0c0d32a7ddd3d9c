pub mod alpha_beta;
pub mod move_ordering;
pub mod tt;

pub use alpha_beta::Engine;

use std::path::Path;
use std::time::Duration;

use miette::{Context, IntoDiagnostic};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::controller::ControllerError;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("search requested on a position that is already decided")]
    GameAlreadyOver,
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// Configuration for search behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub enable_nmp: bool,
    pub emit_info: bool,
    pub hash_size_mb: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enable_nmp: true,
            emit_info: true,
            hash_size_mb: 16,
        }
    }
}

impl SearchConfig {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("reading search config from {}", path.display()))?;
        toml::from_str(&raw)
            .into_diagnostic()
            .context("parsing search config")
    }
}

/// Search limits (time, depth).
#[derive(Default, Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_depth: Option<u8>,
    pub max_time: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self {
            max_depth: Some(depth),
            ..Default::default()
        }
    }

    pub fn time(time_ms: u64) -> Self {
        Self {
            max_time: Some(Duration::from_millis(time_ms)),
            ..Default::default()
        }
    }

    pub fn infinite() -> Self {
        Self::default()
    }
}

/// Result of a search.
#[derive(Debug, Default, Clone)]
pub struct SearchResult {
    pub best_move: Option<shakmaty::Move>,
    pub score: i32,
    pub depth: u8,
    pub nodes_searched: u64,
    pub time_taken: Duration,
}

impl SearchResult {
    pub fn nps(&self) -> u64 {
        let time_ms = self.time_taken.as_millis().max(1) as u64;
        (self.nodes_searched * 1000) / time_ms
    }
}

/// Counters accumulated over one search.
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    pub nodes_searched: u64,
    pub depth_reached: u8,
    pub time_elapsed: Duration,
    pub nps: u64,
    pub hash_full: u16, // per-mille

    pub tt_probes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,

    pub null_move_attempts: u64,
    pub null_move_cutoffs: u64,

    pub beta_cutoffs: u64,
}

impl SearchStats {
    #[inline]
    fn percent(numerator: u64, denominator: u64) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            100.0 * numerator as f64 / denominator as f64
        }
    }

    pub fn calculate_nps(&mut self) {
        let time_ms = self.time_elapsed.as_millis().max(1) as u64;
        self.nps = (self.nodes_searched * 1000) / time_ms;
    }

    pub fn log_summary(&self) {
        debug!("=> SEARCH STATISTICS (depth {})", self.depth_reached);
        debug!(
            "NODES total={} time={:?} nps={}",
            self.nodes_searched, self.time_elapsed, self.nps
        );
        debug!(
            "  - TT Hits:       {:>9} ({:>6.2}% of probes), hash_full: {}/1000",
            self.tt_hits,
            Self::percent(self.tt_hits, self.tt_probes),
            self.hash_full
        );
        debug!(
            "    - TT Cutoffs:  {:>9} ({:>6.2}% of hits)",
            self.tt_cutoffs,
            Self::percent(self.tt_cutoffs, self.tt_hits)
        );
        debug!("  - NMP Attempts:  {:>9}", self.null_move_attempts);
        debug!(
            "    - NMP Cutoffs: {:>9} ({:>6.2}% success rate)",
            self.null_move_cutoffs,
            Self::percent(self.null_move_cutoffs, self.null_move_attempts)
        );
        debug!("  - Beta Cutoffs:  {:>9}", self.beta_cutoffs);
    }
}
