use shakmaty::{Chess, EnPassantMode, Move, Piece, Position, Role, Square};
use thiserror::Error;

use crate::zobrist::ZobristHash;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    #[error("unmake requested with no prior make")]
    EmptyHistory,
    #[error("unmake kind does not match the most recent make")]
    MismatchedHistory,
    #[error("null move rejected by the rules engine")]
    IllegalNullMove,
}

#[derive(Debug, Clone)]
enum UndoRecord {
    Move {
        snapshot: Chess,
        mv: Move,
        captured: Option<(Square, Piece)>,
    },
    Null {
        snapshot: Chess,
    },
}

/// Reversible make/unmake layer over a borrowed position.
///
/// Keeps the incremental Zobrist hash in lockstep with the position. The
/// hash is never recomputed on undo; the toggles applied by make are XOR
/// self-inverse and are simply applied again against the restored state.
#[derive(Debug)]
pub struct MoveController<'a> {
    position: &'a mut Chess,
    hash: ZobristHash,
    undo_stack: Vec<UndoRecord>,
}

impl<'a> MoveController<'a> {
    pub fn new(position: &'a mut Chess) -> Self {
        let hash = ZobristHash::initialize(position);
        Self {
            position,
            hash,
            undo_stack: Vec::with_capacity(crate::consts::MAX_DEPTH),
        }
    }

    #[inline(always)]
    pub fn position(&self) -> &Chess {
        self.position
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash.key()
    }

    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Applies a legal move and updates the hash incrementally.
    pub fn make_move(&mut self, mv: &Move) {
        let captured = captured_piece(self.position, mv);
        let rights_before = self.position.castles().castling_rights();
        let ep_before = self.position.ep_square(EnPassantMode::Legal);
        let snapshot = self.position.clone();

        self.hash.toggle_move(self.position, mv, captured);
        self.position.play_unchecked(mv);
        self.hash
            .toggle_castling_rights(rights_before, self.position.castles().castling_rights());
        self.hash
            .toggle_en_passant(ep_before, self.position.ep_square(EnPassantMode::Legal));

        self.undo_stack.push(UndoRecord::Move {
            snapshot,
            mv: mv.clone(),
            captured,
        });
    }

    /// Reverts the most recent `make_move`.
    pub fn unmake_move(&mut self) -> Result<(), ControllerError> {
        match self.undo_stack.pop() {
            None => Err(ControllerError::EmptyHistory),
            Some(record @ UndoRecord::Null { .. }) => {
                self.undo_stack.push(record);
                Err(ControllerError::MismatchedHistory)
            }
            Some(UndoRecord::Move {
                snapshot,
                mv,
                captured,
            }) => {
                let rights_after = self.position.castles().castling_rights();
                let ep_after = self.position.ep_square(EnPassantMode::Legal);
                *self.position = snapshot;

                // Same toggles as make, against the restored pre-move state.
                self.hash.toggle_move(self.position, &mv, captured);
                self.hash
                    .toggle_castling_rights(rights_after, self.position.castles().castling_rights());
                self.hash
                    .toggle_en_passant(ep_after, self.position.ep_square(EnPassantMode::Legal));
                Ok(())
            }
        }
    }

    /// Passes the turn without moving, for null-move pruning. Fails if the
    /// rules engine rejects the swap, e.g. when the side to move is in check.
    pub fn make_null_move(&mut self) -> Result<(), ControllerError> {
        let ep_before = self.position.ep_square(EnPassantMode::Legal);
        let snapshot = self.position.clone();
        let swapped = self
            .position
            .clone()
            .swap_turn()
            .map_err(|_| ControllerError::IllegalNullMove)?;
        *self.position = swapped;

        self.hash.toggle_side_to_move();
        self.hash
            .toggle_en_passant(ep_before, self.position.ep_square(EnPassantMode::Legal));

        self.undo_stack.push(UndoRecord::Null { snapshot });
        Ok(())
    }

    /// Reverts the most recent `make_null_move`.
    pub fn unmake_null_move(&mut self) -> Result<(), ControllerError> {
        match self.undo_stack.pop() {
            None => Err(ControllerError::EmptyHistory),
            Some(record @ UndoRecord::Move { .. }) => {
                self.undo_stack.push(record);
                Err(ControllerError::MismatchedHistory)
            }
            Some(UndoRecord::Null { snapshot }) => {
                let ep_after = self.position.ep_square(EnPassantMode::Legal);
                *self.position = snapshot;

                self.hash.toggle_side_to_move();
                self.hash
                    .toggle_en_passant(ep_after, self.position.ep_square(EnPassantMode::Legal));
                Ok(())
            }
        }
    }
}

/// Square and piece removed by `mv`, if any. En-passant captures remove a
/// pawn that is not on the destination square.
fn captured_piece(position: &Chess, mv: &Move) -> Option<(Square, Piece)> {
    match mv {
        Move::EnPassant { from, to } => {
            let sq = Square::from_coords(to.file(), from.rank());
            Some((sq, Role::Pawn.of(!position.turn())))
        }
        Move::Normal {
            capture: Some(role),
            to,
            ..
        } => Some((*to, role.of(!position.turn()))),
        _ => None,
    }
}
