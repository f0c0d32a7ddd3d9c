use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use krait::prelude::*;
use shakmaty::{CastlingMode, Position, uci::UciMove};

fn main() -> miette::Result<()> {
    utils::log::init();

    let cli = Cli::parse();
    if cli.verbose {
        set_log_level(Level::DEBUG)?;
    }
    if cli.log_file {
        toggle_file_logging(true)?;
    }

    let span = span!(Level::DEBUG, "main");
    let _guard = span.enter();

    match cli.command {
        Some(Commands::Analyze {
            fen,
            depth,
            time_ms,
            config,
        }) => analyze(&fen, depth, time_ms, config),
        Some(Commands::Play { fen, depth }) => play(&fen, depth),
        Some(Commands::Bench { depth }) => bench(depth),
        None => analyze(START_FEN, 6, None, None),
    }
}

fn analyze(fen: &str, depth: u8, time_ms: Option<u64>, config: Option<PathBuf>) -> Result<()> {
    let mut position = utils::position_from_fen(fen)?;
    let config = match config {
        Some(path) => SearchConfig::load(&path)?,
        None => SearchConfig::default(),
    };
    let mut engine = Engine::with_config(Box::new(MaterialEvaluator), config);

    let mut limits = SearchLimits::depth(depth);
    if let Some(ms) = time_ms {
        limits.max_time = Some(Duration::from_millis(ms));
    }

    info!(evaluator = engine.evaluator_name(), "analyzing {fen}");
    let result = engine
        .find_best_move(&mut position, limits)
        .into_diagnostic()?;
    match &result.best_move {
        Some(mv) => println!("bestmove {}", mv.to_uci(CastlingMode::Standard)),
        None => println!("bestmove (none)"),
    }
    println!(
        "score {} depth {} nodes {} nps {} time {:?}",
        result.score,
        result.depth,
        result.nodes_searched,
        result.nps(),
        result.time_taken
    );
    engine.diagnostics().log_summary();
    Ok(())
}

fn play(fen: &str, depth: u8) -> Result<()> {
    let mut position = utils::position_from_fen(fen)?;
    let mut engine = Engine::default();
    let limits = SearchLimits::depth(depth);
    let stdin = std::io::stdin();

    println!("playing from: {fen}");
    println!("enter moves in UCI notation, or 'quit'");

    loop {
        if let Some(outcome) = position.outcome() {
            println!("game over: {outcome}");
            return Ok(());
        }

        let result = engine
            .find_best_move(&mut position, limits)
            .into_diagnostic()?;
        let Some(mv) = result.best_move else {
            return Ok(());
        };
        println!(
            "engine: {} (score {}, depth {})",
            mv.to_uci(CastlingMode::Standard),
            result.score,
            result.depth
        );
        position.play_unchecked(&mv);

        if let Some(outcome) = position.outcome() {
            println!("game over: {outcome}");
            return Ok(());
        }

        loop {
            print!("your move: ");
            std::io::stdout().flush().into_diagnostic()?;
            let mut line = String::new();
            if stdin.read_line(&mut line).into_diagnostic()? == 0 {
                return Ok(());
            }
            let input = line.trim();
            if input == "quit" {
                return Ok(());
            }
            match input.parse::<UciMove>().map(|uci| uci.to_move(&position)) {
                Ok(Ok(mv)) => {
                    position.play_unchecked(&mv);
                    break;
                }
                Ok(Err(_)) => println!("illegal move in this position: {input}"),
                Err(_) => println!("not a UCI move: {input}"),
            }
        }
    }
}

fn bench(depth: u8) -> Result<()> {
    let suite = [("startpos", START_FEN), ("kiwipete", KIWIPETE)];
    for (name, fen) in suite {
        let mut position = utils::position_from_fen(fen)?;
        let mut engine = Engine::default();
        let result = engine
            .find_best_move(&mut position, SearchLimits::depth(depth))
            .into_diagnostic()?;
        let best = result
            .best_move
            .as_ref()
            .map(|mv| mv.to_uci(CastlingMode::Standard).to_string())
            .unwrap_or_else(|| "(none)".into());
        println!(
            "{name:>9}: depth {} best {best} nodes {} nps {}",
            result.depth,
            result.nodes_searched,
            result.nps()
        );
    }
    Ok(())
}
