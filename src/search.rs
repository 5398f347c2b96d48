use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{trace, warn};

use crate::error::SearchError;
use crate::mode::SearchMode;
use crate::node::{self, SearchNode};
use crate::tile::Tile;
use crate::types::Action;
use crate::world_state::{StateSignature, WorldState};

/// Resource guard for one search run. Adversarial maps can blow the state
/// space up; exhausting the budget surfaces as `NoPathFound`, which the
/// planner cascade already handles.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_expansions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_expansions: 200_000,
        }
    }
}

/// Heap entry ordered by lowest f-cost, ties broken by lower heuristic
/// (prefer the node estimated closer to done), then by insertion order for
/// determinism. `BinaryHeap` is a max-heap, so comparisons are reversed.
#[derive(Clone, Copy, Eq, PartialEq)]
struct OpenEntry {
    f_cost: i32,
    heuristic: i32,
    idx: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.heuristic.cmp(&self.heuristic))
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search over hypothetical world states. `astar` plans to one of
/// an explicit list of target tiles; `explore` runs the same machinery with
/// an empty target list, collapsing the heuristic to zero (uniform cost) and
/// switching the goal test to "this position's perceptual footprint still
/// contains unseen cells".
pub struct Search;

impl Search {
    #[tracing::instrument(level = "trace", skip(state, targets), fields(targets = targets.len(), mode = ?mode))]
    pub fn astar(
        state: &WorldState,
        targets: &[Tile],
        mode: SearchMode,
    ) -> Result<Vec<Action>, SearchError> {
        if targets.is_empty() {
            return Err(SearchError::NoTargets);
        }
        Self::run(state, targets, mode, SearchLimits::default())
    }

    #[tracing::instrument(level = "trace", skip(state), fields(mode = ?mode))]
    pub fn explore(state: &WorldState, mode: SearchMode) -> Result<Vec<Action>, SearchError> {
        Self::run(state, &[], mode, SearchLimits::default())
    }

    /// Shared algorithm behind both entry points. Pure with respect to the
    /// caller's state: only hypothetical copies are ever mutated.
    pub fn run(
        state: &WorldState,
        targets: &[Tile],
        mode: SearchMode,
        limits: SearchLimits,
    ) -> Result<Vec<Action>, SearchError> {
        let mut arena: Vec<SearchNode> = Vec::new();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        // Signature-indexed view of the open set, so duplicate lookup and
        // cost comparison never scan the priority queue.
        let mut open_index: HashMap<StateSignature, (usize, i32)> = HashMap::new();
        let mut closed: HashSet<StateSignature> = HashSet::new();

        let root = SearchNode::root(state.clone(), targets);
        open.push(OpenEntry {
            f_cost: root.f_cost(),
            heuristic: root.heuristic,
            idx: 0,
        });
        open_index.insert(root.state.signature(), (0, root.f_cost()));
        arena.push(root);

        let mut expansions = 0usize;

        while let Some(OpenEntry { idx, .. }) = open.pop() {
            let signature = arena[idx].state.signature();

            // A stale heap entry: a cheaper equivalent node replaced this
            // one, or it was already expanded.
            match open_index.get(&signature) {
                Some(&(best_idx, _)) if best_idx == idx => {}
                _ => continue,
            }
            open_index.remove(&signature);

            if Self::is_goal(&arena[idx].state, targets) {
                let plan = Self::reconstruct(&arena, idx);
                trace!(expansions, cost = arena[idx].cost, len = plan.len(), "goal reached");
                return Ok(plan);
            }
            closed.insert(signature);

            expansions += 1;
            if expansions > limits.max_expansions {
                warn!(expansions, "expansion budget exhausted, giving up");
                return Err(SearchError::NoPathFound);
            }

            for (action, child_state, delta) in node::successors(&arena[idx].state, mode)? {
                let child_signature = child_state.signature();
                if closed.contains(&child_signature) {
                    continue;
                }
                // Local cycle filter: never re-enter a state already on this
                // branch's own ancestor chain.
                if Self::on_ancestor_chain(&arena, idx, &child_state) {
                    continue;
                }

                let cost = arena[idx].cost + delta;
                let heuristic = node::heuristic(child_state.pos, targets);
                let f_cost = cost + heuristic;

                // Keep the open set's best-known node per signature. An
                // equivalent open node at equal or better f-cost wins; a
                // strictly worse one is replaced (the old heap entry goes
                // stale and is skipped on pop).
                if let Some(&(_, open_f)) = open_index.get(&child_signature) {
                    if open_f <= f_cost {
                        continue;
                    }
                }

                let child_idx = arena.len();
                arena.push(SearchNode {
                    state: child_state,
                    cost,
                    heuristic,
                    action: Some(action),
                    parent: Some(idx),
                });
                open_index.insert(child_signature, (child_idx, f_cost));
                open.push(OpenEntry {
                    f_cost,
                    heuristic,
                    idx: child_idx,
                });
            }
        }

        trace!(expansions, "frontier exhausted");
        Err(SearchError::NoPathFound)
    }

    fn is_goal(state: &WorldState, targets: &[Tile]) -> bool {
        if targets.is_empty() {
            state.map.unseen_around(state.pos) > 0
        } else {
            targets.iter().any(|target| target.pos == state.pos)
        }
    }

    fn on_ancestor_chain(arena: &[SearchNode], mut idx: usize, child: &WorldState) -> bool {
        loop {
            if arena[idx].state.same_state(child) {
                return true;
            }
            match arena[idx].parent {
                Some(parent) => idx = parent,
                None => return false,
            }
        }
    }

    fn reconstruct(arena: &[SearchNode], mut idx: usize) -> Vec<Action> {
        let mut plan = Vec::new();
        loop {
            match (arena[idx].action, arena[idx].parent) {
                (Some(action), Some(parent)) => {
                    plan.push(action);
                    idx = parent;
                }
                _ => break,
            }
        }
        plan.reverse();
        plan
    }
}
