use crate::tile::{Terrain, Tile};
use crate::types::Action;
use crate::world_state::WorldState;

/// Policy restricting which actions are legal during one search run. The
/// mode trades completeness against how much irreversible damage a plan may
/// do to the world (and to the raft).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// No chopping, unlocking or detonating; movement may not change
    /// terrain kind (stay on land, or stay on water).
    Safe,
    /// Chop with an axe, unlock with a key, sail with a raft. No dynamite.
    Moderate,
    /// Everything, including dynamite.
    Free,
    /// Reachability probe assuming unlimited tools. Plans found here must be
    /// validated against real inventory before execution.
    Hypothetical,
}

impl SearchMode {
    /// Whether tool preconditions are assumed rather than checked.
    pub fn assumes_tools(self) -> bool {
        matches!(self, SearchMode::Hypothetical)
    }

    /// Single legality predicate used by successor generation. `forward` is
    /// the already-perceived tile directly ahead.
    pub fn allows(self, action: Action, state: &WorldState, forward: &Tile) -> bool {
        match action {
            Action::TurnLeft | Action::TurnRight | Action::Rest => true,
            Action::Forward => self.allows_move(state, forward),
            Action::Chop => {
                forward.terrain == Terrain::Tree
                    && match self {
                        SearchMode::Safe => false,
                        SearchMode::Moderate | SearchMode::Free => state.has_axe,
                        SearchMode::Hypothetical => true,
                    }
            }
            Action::Unlock => {
                forward.terrain == Terrain::Door
                    && match self {
                        SearchMode::Safe => false,
                        SearchMode::Moderate | SearchMode::Free => state.has_key,
                        SearchMode::Hypothetical => true,
                    }
            }
            Action::Detonate => {
                forward.terrain.destructible()
                    && match self {
                        SearchMode::Safe | SearchMode::Moderate => false,
                        SearchMode::Free => state.has_dynamite(),
                        SearchMode::Hypothetical => true,
                    }
            }
        }
    }

    fn allows_move(self, state: &WorldState, forward: &Tile) -> bool {
        if forward.terrain.blocks_movement() {
            return false;
        }
        match self {
            SearchMode::Hypothetical => true,
            SearchMode::Safe => forward.terrain == state.current_terrain(),
            SearchMode::Moderate | SearchMode::Free => {
                forward.terrain != Terrain::Water || state.has_raft
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Position};
    use crate::world_state::tests::state_from_rows;

    fn forward(state: &WorldState) -> Tile {
        *state.forward_tile().unwrap()
    }

    #[test]
    fn test_safe_mode_never_alters_terrain() {
        let mut state = state_from_rows(&[" t"], Position::new(0, 0), Direction::East);
        state.has_axe = true;
        state.has_key = true;
        state.dynamite = 5;
        let ahead = forward(&state);

        assert!(!SearchMode::Safe.allows(Action::Chop, &state, &ahead));
        assert!(!SearchMode::Safe.allows(Action::Detonate, &state, &ahead));
        assert!(SearchMode::Safe.allows(Action::TurnLeft, &state, &ahead));
    }

    #[test]
    fn test_safe_mode_stays_on_current_terrain_kind() {
        let on_land = state_from_rows(&[" ~"], Position::new(0, 0), Direction::East);
        assert!(!SearchMode::Safe.allows(Action::Forward, &on_land, &forward(&on_land)));

        let on_water = state_from_rows(&["~~"], Position::new(0, 0), Direction::East);
        assert!(SearchMode::Safe.allows(Action::Forward, &on_water, &forward(&on_water)));

        // Coming ashore also changes terrain kind: not safe.
        let ashore = state_from_rows(&["~ "], Position::new(0, 0), Direction::East);
        assert!(!SearchMode::Safe.allows(Action::Forward, &ashore, &forward(&ashore)));
    }

    #[test]
    fn test_water_entry_requires_raft_outside_safe() {
        let mut state = state_from_rows(&[" ~"], Position::new(0, 0), Direction::East);
        let ahead = forward(&state);

        assert!(!SearchMode::Moderate.allows(Action::Forward, &state, &ahead));
        assert!(!SearchMode::Free.allows(Action::Forward, &state, &ahead));
        state.has_raft = true;
        assert!(SearchMode::Moderate.allows(Action::Forward, &state, &ahead));
        assert!(SearchMode::Free.allows(Action::Forward, &state, &ahead));
    }

    #[test]
    fn test_tool_gating_per_mode() {
        let mut state = state_from_rows(&[" t"], Position::new(0, 0), Direction::East);
        let tree = forward(&state);

        assert!(!SearchMode::Moderate.allows(Action::Chop, &state, &tree));
        state.has_axe = true;
        assert!(SearchMode::Moderate.allows(Action::Chop, &state, &tree));
        assert!(SearchMode::Free.allows(Action::Chop, &state, &tree));

        // Dynamite is Free-only, and only with stock in inventory.
        assert!(!SearchMode::Moderate.allows(Action::Detonate, &state, &tree));
        assert!(!SearchMode::Free.allows(Action::Detonate, &state, &tree));
        state.dynamite = 1;
        assert!(SearchMode::Free.allows(Action::Detonate, &state, &tree));
    }

    #[test]
    fn test_hypothetical_assumes_unlimited_tools() {
        let state = state_from_rows(&[" -"], Position::new(0, 0), Direction::East);
        let door = forward(&state);

        assert!(SearchMode::Hypothetical.allows(Action::Unlock, &state, &door));
        assert!(SearchMode::Hypothetical.allows(Action::Detonate, &state, &door));
        // Physical preconditions still hold: a door is not choppable.
        assert!(!SearchMode::Hypothetical.allows(Action::Chop, &state, &door));
        // Doors still block plain movement until opened.
        assert!(!SearchMode::Hypothetical.allows(Action::Forward, &state, &door));
    }
}
