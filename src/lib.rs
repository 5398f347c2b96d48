//! Planning core for a treasure-hunt agent on a partially observed grid.
//!
//! The agent perceives the world through a 5x5 window, builds a sparse map,
//! and plans with best-first search over hypothetical world states. Plans are
//! action sequences (step, turn, chop, unlock, detonate) scored by a tunable
//! cost model; search permissiveness is graded by [`SearchMode`], from
//! terrain-preserving reconnaissance up to dynamite.

pub mod error;
pub mod map;
pub mod mode;
pub mod node;
pub mod planner;
pub mod search;
pub mod tile;
pub mod types;
pub mod world_state;

pub use error::{SearchError, StateError};
pub use map::WorldMap;
pub use mode::SearchMode;
pub use planner::{Agent, ToolDemand};
pub use search::{Search, SearchLimits};
pub use tile::{Item, Terrain, Tile};
pub use types::{Action, Direction, Position, View};
pub use world_state::WorldState;
