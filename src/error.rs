//! Error types for the planning core.
//!
//! `NoPathFound` and `NoTargets` are ordinary outcomes the caller branches
//! on when cascading through fallback strategies. `StateError`s are defects:
//! they abort the affected search instead of letting it return a
//! plausible-looking wrong plan.

use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Perception produced a character outside the tile alphabet.
    #[error("character '{ch}' at ({x}, {y}) is not a valid tile kind", x = .pos.x, y = .pos.y)]
    InvalidTileKind { ch: char, pos: Position },

    /// A pickup/chop/detonate tried to remove a tile that was never
    /// registered in its discovery list. Indicates broken perception
    /// bookkeeping, unrecoverable within the session.
    #[error("tile at ({x}, {y}) is missing from the {ledger} ledger", x = .pos.x, y = .pos.y)]
    DiscoveryLedgerMismatch { ledger: &'static str, pos: Position },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Targeted search was invoked with an empty target list.
    #[error("no targets provided")]
    NoTargets,

    /// The frontier was exhausted without reaching a goal.
    #[error("exhausted all possibilities without reaching a goal")]
    NoPathFound,

    /// World-state bookkeeping broke while expanding a node.
    #[error(transparent)]
    State(#[from] StateError),
}
