use crate::error::StateError;
use crate::mode::SearchMode;
use crate::tile::{Terrain, Tile};
use crate::types::{Action, Position};
use crate::world_state::WorldState;

// Cost tuning. Turning, walking and unlocking are unit moves. Coming ashore
// throws the raft away, so it carries a penalty; heading out onto the water
// (or chopping a second raft) gets cheaper the more spare trees are known,
// since a replacement raft is easy to come by. Detonating a wall is the only
// way through it; trees and doors have cheaper removal tools, so wasting
// dynamite on them costs extra.
pub const TURN_COST: i32 = 1;
pub const MOVE_COST: i32 = 1;
pub const UNLOCK_COST: i32 = 1;
pub const WATER_TO_LAND_COST: i32 = 5;
pub const LAND_TO_WATER_COST: i32 = 10;
pub const CHOP_WITH_RAFT_COST: i32 = 10;
pub const DETONATE_WALL_COST: i32 = 20;
pub const DETONATE_REMOVABLE_COST: i32 = 30;

/// One hypothetical state in the search tree: a world snapshot plus search
/// bookkeeping. The parent index points into the engine's node arena and is
/// used only to reconstruct the path, never for equality.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: WorldState,
    pub cost: i32,
    pub heuristic: i32,
    pub action: Option<Action>,
    pub parent: Option<usize>,
}

impl SearchNode {
    pub fn root(state: WorldState, targets: &[Tile]) -> Self {
        let heuristic = heuristic(state.pos, targets);
        Self {
            state,
            cost: 0,
            heuristic,
            action: None,
            parent: None,
        }
    }

    pub fn f_cost(&self) -> i32 {
        self.cost + self.heuristic
    }
}

/// Manhattan distance to the nearest target, or 0 with no targets (which
/// collapses A* into uniform-cost exploration).
pub fn heuristic(pos: Position, targets: &[Tile]) -> i32 {
    targets
        .iter()
        .map(|target| pos.distance(&target.pos))
        .min()
        .unwrap_or(0)
}

fn tree_discounted(base: i32, known_trees: usize) -> i32 {
    let trees = known_trees.max(1) as i32;
    (base + trees - 1) / trees
}

/// Nonnegative cost increment for taking `action` from `state` (evaluated
/// against the state before the action).
pub fn action_cost(state: &WorldState, action: Action) -> i32 {
    let forward_terrain = state.forward_tile().map(|tile| tile.terrain);
    match action {
        Action::TurnLeft | Action::TurnRight => TURN_COST,
        Action::Unlock => UNLOCK_COST,
        Action::Rest => 0,
        Action::Forward => match (state.current_terrain(), forward_terrain) {
            (Terrain::Water, Some(Terrain::Land)) => WATER_TO_LAND_COST,
            (from, Some(Terrain::Water)) if from != Terrain::Water => {
                tree_discounted(LAND_TO_WATER_COST, state.known_trees.len())
            }
            _ => MOVE_COST,
        },
        Action::Chop => {
            if state.has_raft {
                tree_discounted(CHOP_WITH_RAFT_COST, state.known_trees.len())
            } else {
                MOVE_COST
            }
        }
        Action::Detonate => match forward_terrain {
            Some(Terrain::Tree) | Some(Terrain::Door) => DETONATE_REMOVABLE_COST,
            _ => DETONATE_WALL_COST,
        },
    }
}

/// Generate the legal `(action, child state, cost increment)` triples from a
/// node's state. Turns are always available; forward/chop/unlock/detonate
/// only when the forward tile has been perceived (search never plans into
/// unobserved terrain) and the mode's legality table admits them.
pub fn successors(
    state: &WorldState,
    mode: SearchMode,
) -> Result<Vec<(Action, WorldState, i32)>, StateError> {
    let mut children = Vec::with_capacity(6);

    for action in [Action::TurnLeft, Action::TurnRight] {
        let mut child = state.clone();
        child.apply(action, mode)?;
        children.push((action, child, TURN_COST));
    }

    if let Some(forward) = state.forward_tile().copied() {
        for action in [Action::Forward, Action::Chop, Action::Unlock, Action::Detonate] {
            if !mode.allows(action, state, &forward) {
                continue;
            }
            let delta = action_cost(state, action);
            let mut child = state.clone();
            child.apply(action, mode)?;
            children.push((action, child, delta));
        }
    }

    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Item;
    use crate::types::Direction;
    use crate::world_state::tests::state_from_rows;

    #[test]
    fn test_heuristic_is_nearest_target_distance() {
        let far = Tile {
            terrain: Terrain::Land,
            item: Some(Item::Treasure),
            pos: Position::new(10, 10),
        };
        let near = Tile {
            terrain: Terrain::Land,
            item: None,
            pos: Position::new(2, 1),
        };
        assert_eq!(heuristic(Position::new(0, 0), &[far, near]), 3);
        assert_eq!(heuristic(Position::new(0, 0), &[]), 0);
    }

    #[test]
    fn test_turns_and_unlock_cost_one() {
        let state = state_from_rows(&[" -"], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&state, Action::TurnLeft), 1);
        assert_eq!(action_cost(&state, Action::TurnRight), 1);
        assert_eq!(action_cost(&state, Action::Unlock), 1);
    }

    #[test]
    fn test_water_crossing_costs() {
        let ashore = state_from_rows(&["~ "], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&ashore, Action::Forward), WATER_TO_LAND_COST);

        // No spare trees known: full launch penalty.
        let launching = state_from_rows(&[" ~"], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&launching, Action::Forward), LAND_TO_WATER_COST);

        // Plenty of known trees make raft access cheap to give up.
        let launching = state_from_rows(&[" ~  ", "ttt "], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&launching, Action::Forward), 4);

        let paddling = state_from_rows(&["~~"], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&paddling, Action::Forward), MOVE_COST);
    }

    #[test]
    fn test_chop_cost_depends_on_raft_and_tree_supply() {
        let mut state = state_from_rows(&[" t"], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&state, Action::Chop), MOVE_COST);

        state.has_raft = true;
        assert_eq!(action_cost(&state, Action::Chop), CHOP_WITH_RAFT_COST);

        let mut rich = state_from_rows(&[" t", "tt"], Position::new(0, 0), Direction::East);
        rich.has_raft = true;
        assert_eq!(action_cost(&rich, Action::Chop), 4);
    }

    #[test]
    fn test_tree_discount_rounds_up() {
        assert_eq!(tree_discounted(10, 0), 10);
        assert_eq!(tree_discounted(10, 1), 10);
        assert_eq!(tree_discounted(10, 3), 4);
        assert_eq!(tree_discounted(10, 4), 3);
        assert_eq!(tree_discounted(10, 5), 2);
        assert_eq!(tree_discounted(10, 100), 1);
    }

    #[test]
    fn test_detonate_prefers_walls() {
        let wall = state_from_rows(&[" *"], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&wall, Action::Detonate), DETONATE_WALL_COST);

        let tree = state_from_rows(&[" t"], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&tree, Action::Detonate), DETONATE_REMOVABLE_COST);

        let door = state_from_rows(&[" -"], Position::new(0, 0), Direction::East);
        assert_eq!(action_cost(&door, Action::Detonate), DETONATE_REMOVABLE_COST);
    }

    #[test]
    fn test_expansion_respects_mode_legality() {
        // Scenario C: tree ahead, axe in hand, Moderate mode.
        let mut state = state_from_rows(&[" t"], Position::new(0, 0), Direction::East);
        state.has_axe = true;

        let children = successors(&state, SearchMode::Moderate).unwrap();
        let chop = children
            .iter()
            .find(|(action, _, _)| *action == Action::Chop)
            .expect("chop must be a legal expansion");

        assert!(chop.1.has_raft);
        assert_eq!(
            chop.1.map.get(&Position::new(1, 0)).unwrap().terrain,
            Terrain::Land
        );
        // Trees don't block walking, so Forward is also offered; dynamite is not.
        assert!(children.iter().any(|(a, _, _)| *a == Action::Forward));
        assert!(children.iter().all(|(a, _, _)| *a != Action::Detonate));
    }

    #[test]
    fn test_expansion_never_plans_into_unseen_terrain() {
        // Forward cell never perceived: only the turns come back.
        let mut state = state_from_rows(&[" "], Position::new(0, 0), Direction::East);
        state.has_axe = true;
        state.dynamite = 1;

        let children = successors(&state, SearchMode::Free).unwrap();
        let actions: Vec<Action> = children.iter().map(|(a, _, _)| *a).collect();
        assert_eq!(actions, vec![Action::TurnLeft, Action::TurnRight]);
    }

    #[test]
    fn test_expansion_leaves_parent_map_untouched() {
        let mut state = state_from_rows(&[" t"], Position::new(0, 0), Direction::East);
        state.has_axe = true;

        let children = successors(&state, SearchMode::Free).unwrap();
        assert!(!children.is_empty());
        assert_eq!(
            state.map.get(&Position::new(1, 0)).unwrap().terrain,
            Terrain::Tree
        );
    }
}
