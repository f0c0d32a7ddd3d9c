pub mod cli;
pub mod log;

use miette::{Context, IntoDiagnostic};
use shakmaty::{CastlingMode, Chess, fen::Fen};

/// Parses a FEN string into a playable position.
pub fn position_from_fen(fen: &str) -> miette::Result<Chess> {
    let fen: Fen = fen
        .parse()
        .into_diagnostic()
        .with_context(|| format!("invalid FEN: {fen}"))?;
    fen.into_position(CastlingMode::Standard)
        .into_diagnostic()
        .context("FEN does not describe a legal position")
}
