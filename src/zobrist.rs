use std::sync::LazyLock;

use rand::{Rng, SeedableRng, rngs::StdRng};
use shakmaty::{
    Bitboard, Chess, Color, EnPassantMode, File, Move, Piece, Position, Role, Square,
};

use crate::consts::{NUM_CASTLING_RIGHTS, NUM_FILES, NUM_ROLES, NUM_SIDES, NUM_SQUARES};

/// One castling key per right, keyed by the rook's home square.
pub const ROOK_HOME_SQUARES: [Square; NUM_CASTLING_RIGHTS] =
    [Square::H1, Square::A1, Square::H8, Square::A8];

pub static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::new);

/// Random keys for every hashable feature of a position.
///
/// Seeded deterministically so hashes are stable across runs; a stored
/// transposition table would otherwise be useless after a restart.
pub struct ZobristKeys {
    pub pieces: [[[u64; NUM_SQUARES]; NUM_ROLES]; NUM_SIDES],
    pub castling: [u64; NUM_CASTLING_RIGHTS],
    pub en_passant: [u64; NUM_FILES],
    pub black_to_move: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x9E37_79B9_7F4A_7C15);
        let mut pieces = [[[0u64; NUM_SQUARES]; NUM_ROLES]; NUM_SIDES];
        for side in pieces.iter_mut() {
            for role in side.iter_mut() {
                for key in role.iter_mut() {
                    *key = rng.random();
                }
            }
        }
        let mut castling = [0u64; NUM_CASTLING_RIGHTS];
        for key in castling.iter_mut() {
            *key = rng.random();
        }
        let mut en_passant = [0u64; NUM_FILES];
        for key in en_passant.iter_mut() {
            *key = rng.random();
        }
        Self {
            pieces,
            castling,
            en_passant,
            black_to_move: rng.random(),
        }
    }
}

#[inline(always)]
pub fn side_index(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

#[inline(always)]
fn piece_key(piece: Piece, sq: Square) -> u64 {
    ZOBRIST.pieces[side_index(piece.color)][piece.role as usize - 1][sq as usize]
}

/// Destination squares for king and rook when castling, derived from the
/// rook's side of the king. Works for both colors.
pub(crate) fn castle_destinations(king: Square, rook: Square) -> (Square, Square) {
    let rank = king.rank();
    if rook.file() < king.file() {
        (
            Square::from_coords(File::C, rank),
            Square::from_coords(File::D, rank),
        )
    } else {
        (
            Square::from_coords(File::G, rank),
            Square::from_coords(File::F, rank),
        )
    }
}

/// Incrementally maintained Zobrist hash of a position.
///
/// Every mutation is an XOR toggle, so applying the same toggles again
/// undoes them. The en-passant file is folded in only when an en-passant
/// capture is actually legal; a double push with no capturer must hash
/// identically to the same position reached without the double push.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZobristHash {
    key: u64,
}

impl ZobristHash {
    /// Computes the hash of `position` from scratch.
    pub fn initialize(position: &Chess) -> Self {
        let mut hash = Self::default();
        hash.reset(position);
        hash
    }

    pub fn reset(&mut self, position: &Chess) {
        self.key = 0;
        let board = position.board();
        for sq in board.occupied() {
            if let Some(piece) = board.piece_at(sq) {
                self.key ^= piece_key(piece, sq);
            }
        }
        if position.turn() == Color::Black {
            self.key ^= ZOBRIST.black_to_move;
        }
        let rights = position.castles().castling_rights();
        for (rook_sq, key) in ROOK_HOME_SQUARES.iter().zip(ZOBRIST.castling.iter()) {
            if rights.contains(*rook_sq) {
                self.key ^= key;
            }
        }
        if let Some(ep_sq) = position.ep_square(EnPassantMode::Legal) {
            self.key ^= ZOBRIST.en_passant[ep_sq.file() as usize];
        }
    }

    #[inline(always)]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Toggles the piece-placement and side-to-move keys for `mv`.
    ///
    /// `position` must be the state with the mover still on its origin
    /// square, i.e. the pre-move position. The same call therefore undoes
    /// the move once the position has been rolled back.
    pub fn toggle_move(&mut self, position: &Chess, mv: &Move, captured: Option<(Square, Piece)>) {
        let mover = position.turn();
        match mv {
            Move::Castle { king, rook } => {
                let (king, rook) = (*king, *rook);
                let (king_to, rook_to) = castle_destinations(king, rook);
                self.key ^= piece_key(Role::King.of(mover), king);
                self.key ^= piece_key(Role::King.of(mover), king_to);
                self.key ^= piece_key(Role::Rook.of(mover), rook);
                self.key ^= piece_key(Role::Rook.of(mover), rook_to);
            }
            _ => {
                if let Some(from) = mv.from() {
                    let role = mv.role();
                    self.key ^= piece_key(Piece { color: mover, role }, from);
                    let landed = mv.promotion().unwrap_or(role);
                    self.key ^= piece_key(
                        Piece {
                            color: mover,
                            role: landed,
                        },
                        mv.to(),
                    );
                }
            }
        }
        if let Some((sq, piece)) = captured {
            self.key ^= piece_key(piece, sq);
        }
        self.key ^= ZOBRIST.black_to_move;
    }

    /// Toggles the keys for every castling right that differs between the
    /// two rights sets. XOR of the before/after bitboards leaves exactly
    /// the changed rook home squares.
    pub fn toggle_castling_rights(&mut self, before: Bitboard, after: Bitboard) {
        let changed = before ^ after;
        for (rook_sq, key) in ROOK_HOME_SQUARES.iter().zip(ZOBRIST.castling.iter()) {
            if changed.contains(*rook_sq) {
                self.key ^= key;
            }
        }
    }

    /// Toggles the en-passant file keys for a transition between two
    /// (possibly absent) legal en-passant squares. Identical files cancel
    /// out, so calling with `before == after` is a no-op.
    pub fn toggle_en_passant(&mut self, before: Option<Square>, after: Option<Square>) {
        if let Some(sq) = before {
            self.key ^= ZOBRIST.en_passant[sq.file() as usize];
        }
        if let Some(sq) = after {
            self.key ^= ZOBRIST.en_passant[sq.file() as usize];
        }
    }

    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.key ^= ZOBRIST.black_to_move;
    }
}
