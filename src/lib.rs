pub mod controller;
pub mod evaluation;
pub mod prelude;
pub mod search;
pub mod utils;
pub mod zobrist;

pub mod consts {
    pub const NUM_SIDES: usize = 2;
    pub const NUM_ROLES: usize = 6;
    pub const NUM_SQUARES: usize = 64;
    pub const NUM_FILES: usize = 8;
    pub const NUM_CASTLING_RIGHTS: usize = 4;

    /// Deepest iterative-deepening pass the engine will run.
    pub const MAX_DEPTH: usize = 64;

    /// Score of a decided game, from the winner's point of view.
    pub const WIN_SCORE: i32 = 100_000;
    /// Window sentinel, strictly outside every reachable score.
    pub const INF: i32 = 1_000_000;

    /// Depth reduction applied to the null-move reply search.
    pub const NULL_MOVE_REDUCTION: u8 = 2;

    pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
}
