use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::error::{SearchError, StateError};
use crate::mode::SearchMode;
use crate::search::Search;
use crate::tile::{Item, Tile};
use crate::types::{Action, Position, View};
use crate::world_state::WorldState;

/// Tool consumption of a plan, for validating `Hypothetical` search results
/// against real inventory before committing to them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolDemand {
    pub needs_axe: bool,
    pub needs_key: bool,
    pub dynamite: u32,
}

impl ToolDemand {
    pub fn of_plan(plan: &[Action]) -> Self {
        let mut demand = ToolDemand::default();
        for action in plan {
            match action {
                Action::Chop => demand.needs_axe = true,
                Action::Unlock => demand.needs_key = true,
                Action::Detonate => demand.dynamite += 1,
                _ => {}
            }
        }
        demand
    }

    pub fn satisfied_by(&self, state: &WorldState) -> bool {
        (!self.needs_axe || state.has_axe)
            && (!self.needs_key || state.has_key)
            && self.dynamite <= state.dynamite
    }
}

/// The live agent: owns the real world state and a queued plan, and decides
/// one action per perception cycle by cascading through search strategies of
/// increasing permissiveness.
pub struct Agent {
    pub world: WorldState,
    home: Position,
    plan: VecDeque<Action>,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent {
    pub fn new() -> Self {
        let world = WorldState::new();
        Self {
            home: world.pos,
            plan: VecDeque::new(),
            world,
        }
    }

    pub fn home(&self) -> Position {
        self.home
    }

    pub fn queued_plan(&self) -> usize {
        self.plan.len()
    }

    /// Integrate one perception window and return the next action. Either
    /// continues a queued plan, or replans through the strategy cascade:
    /// carry the treasure home, explore safely, chase known treasures, chase
    /// known items, then explore with progressively more destructive modes.
    /// A random turn or step is the last resort when every search fails.
    #[tracing::instrument(level = "debug", skip(self, view))]
    pub fn next_action(&mut self, view: &View) -> Result<Action, StateError> {
        self.world.apply_view(view)?;

        if let Some(action) = self.plan.pop_front() {
            debug!(?action, queued = self.plan.len(), "continuing existing plan");
            self.world.apply(action, SearchMode::Free)?;
            return Ok(action);
        }

        if let Some(plan) = self.replan()? {
            self.plan = plan.into();
            if let Some(action) = self.plan.pop_front() {
                self.world.apply(action, SearchMode::Free)?;
                return Ok(action);
            }
        }

        let action = self.random_fallback();
        debug!(?action, "no viable search result, random fallback");
        self.world.apply(action, SearchMode::Free)?;
        Ok(action)
    }

    fn replan(&self) -> Result<Option<Vec<Action>>, StateError> {
        if self.world.has_treasure {
            if let Some(home) = self.world.map.get(&self.home).copied() {
                debug!("holding treasure, planning route home");
                if let Some(plan) =
                    attempt(Search::astar(&self.world, &[home], SearchMode::Free), "home")?
                {
                    return Ok(Some(plan));
                }
            }
        }

        if let Some(plan) = attempt(
            Search::explore(&self.world, SearchMode::Safe),
            "safe exploration",
        )? {
            return Ok(Some(plan));
        }

        if !self.world.known_treasures.is_empty() {
            if let Some(plan) = attempt(
                Search::astar(&self.world, &self.world.known_treasures, SearchMode::Free),
                "treasure",
            )? {
                return Ok(Some(plan));
            }
        }

        // A known treasure that Free search cannot reach may still be
        // attainable once the right tools are in hand. Ask the unlimited-tools
        // search for any route, and fetch the tools its demand is missing.
        if !self.world.known_treasures.is_empty() {
            if let Some(route) = attempt(
                Search::astar(
                    &self.world,
                    &self.world.known_treasures,
                    SearchMode::Hypothetical,
                ),
                "hypothetical treasure route",
            )? {
                let demand = ToolDemand::of_plan(&route);
                if !demand.satisfied_by(&self.world) {
                    let tools = self.demanded_tools(demand);
                    if !tools.is_empty() {
                        if let Some(plan) = attempt(
                            Search::astar(&self.world, &tools, SearchMode::Free),
                            "demanded tools",
                        )? {
                            return Ok(Some(plan));
                        }
                    }
                }
            }
        }

        if !self.world.known_items.is_empty() {
            if let Some(plan) = attempt(
                Search::astar(&self.world, &self.world.known_items, SearchMode::Free),
                "items",
            )? {
                return Ok(Some(plan));
            }
        }

        if let Some(plan) = attempt(
            Search::explore(&self.world, SearchMode::Moderate),
            "moderate exploration",
        )? {
            return Ok(Some(plan));
        }

        if let Some(plan) = attempt(
            Search::explore(&self.world, SearchMode::Free),
            "free exploration",
        )? {
            return Ok(Some(plan));
        }

        Ok(None)
    }

    /// Known item tiles that would fill the gap between a plan's tool demand
    /// and current inventory.
    fn demanded_tools(&self, demand: ToolDemand) -> Vec<Tile> {
        self.world
            .known_items
            .iter()
            .filter(|tile| match tile.item {
                Some(Item::Axe) => demand.needs_axe && !self.world.has_axe,
                Some(Item::Key) => demand.needs_key && !self.world.has_key,
                Some(Item::Dynamite) => demand.dynamite > self.world.dynamite,
                _ => false,
            })
            .copied()
            .collect()
    }

    fn random_fallback(&self) -> Action {
        let mut rng = rand::rng();
        if let Some(tile) = self.world.forward_tile() {
            if SearchMode::Moderate.allows(Action::Forward, &self.world, tile)
                && rng.random_bool(0.5)
            {
                return Action::Forward;
            }
        }
        if rng.random_bool(0.5) {
            Action::TurnLeft
        } else {
            Action::TurnRight
        }
    }
}

/// Treat `NoPathFound`/`NoTargets` as "try the next strategy" and an empty
/// plan as already-there; state corruption propagates as a hard error.
fn attempt(
    result: Result<Vec<Action>, SearchError>,
    what: &'static str,
) -> Result<Option<Vec<Action>>, StateError> {
    match result {
        Ok(plan) if plan.is_empty() => {
            debug!(what, "already at goal, nothing to do");
            Ok(None)
        }
        Ok(plan) => {
            debug!(what, len = plan.len(), "found plan");
            Ok(Some(plan))
        }
        Err(SearchError::NoPathFound | SearchError::NoTargets) => {
            debug!(what, "no path");
            Ok(None)
        }
        Err(SearchError::State(err)) => Err(err),
    }
}
