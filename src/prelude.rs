pub use crate::consts::*;
pub use crate::controller::{ControllerError, MoveController};
pub use crate::evaluation::{Evaluator, MaterialEvaluator};
pub use crate::search::{
    self, Engine, SearchConfig, SearchError, SearchLimits, SearchResult, SearchStats,
};
pub use crate::utils::{self, cli::*, log::*};
pub use crate::zobrist::{ZOBRIST, ZobristHash};
pub use miette::{self, Context, IntoDiagnostic, Result};
pub use std::fmt::Display;
pub use std::str::FromStr;
pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
