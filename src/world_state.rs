use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::trace;

use crate::error::StateError;
use crate::map::WorldMap;
use crate::mode::SearchMode;
use crate::tile::{Item, Terrain, Tile};
use crate::types::{Action, Direction, Position, VIEW_RANGE, View};

/// The full planning-relevant snapshot shared by the live agent and every
/// hypothetical search node: position, facing, inventory, the map, the
/// change-logs and the discovery lists.
///
/// The map is held behind `Rc` so sibling search branches share it until one
/// of them mutates; every mutation path goes through `Rc::make_mut`, which
/// deep-copies the map exactly when it is shared. No node ever observes a
/// mutation performed through another node's reference.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub pos: Position,
    pub facing: Direction,

    pub has_axe: bool,
    pub has_key: bool,
    pub has_raft: bool,
    pub has_treasure: bool,
    pub dynamite: u32,

    pub map: Rc<WorldMap>,

    /// Change-logs: the only map-difference data used for state equivalence.
    /// Comparing the whole sparse grid cell by cell is prohibitively
    /// expensive; under correct mutation rules, equal logs imply equal maps.
    pub doors_opened: BTreeSet<Position>,
    pub trees_chopped: BTreeSet<Position>,
    pub tiles_blown: BTreeSet<Position>,

    /// Discovery lists: known but not yet collected/consumed tiles.
    pub known_trees: Vec<Tile>,
    pub known_items: Vec<Tile>,
    pub known_treasures: Vec<Tile>,
}

/// The cheap equality/hash contract used by the open and closed sets.
/// Deliberately excludes the map itself; the change-logs stand in for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateSignature {
    pos: Position,
    facing: Direction,
    has_axe: bool,
    has_key: bool,
    has_raft: bool,
    has_treasure: bool,
    dynamite: u32,
    doors_opened: BTreeSet<Position>,
    trees_chopped: BTreeSet<Position>,
    tiles_blown: BTreeSet<Position>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            pos: Position::new(0, 0),
            facing: Direction::North,
            has_axe: false,
            has_key: false,
            has_raft: false,
            has_treasure: false,
            dynamite: 0,
            map: Rc::new(WorldMap::new()),
            doors_opened: BTreeSet::new(),
            trees_chopped: BTreeSet::new(),
            tiles_blown: BTreeSet::new(),
            known_trees: Vec::new(),
            known_items: Vec::new(),
            known_treasures: Vec::new(),
        }
    }

    pub fn has_dynamite(&self) -> bool {
        self.dynamite > 0
    }

    pub fn forward_pos(&self) -> Position {
        self.pos.step(self.facing)
    }

    pub fn forward_tile(&self) -> Option<&Tile> {
        self.map.get(&self.forward_pos())
    }

    pub fn current_terrain(&self) -> Terrain {
        self.map
            .get(&self.pos)
            .map(|tile| tile.terrain)
            .unwrap_or(Terrain::Land)
    }

    /// State equivalence for search purposes: position, facing, inventory,
    /// dynamite count and set-equality of the three change-logs.
    pub fn same_state(&self, other: &WorldState) -> bool {
        self.pos == other.pos
            && self.facing == other.facing
            && self.has_axe == other.has_axe
            && self.has_key == other.has_key
            && self.has_raft == other.has_raft
            && self.has_treasure == other.has_treasure
            && self.dynamite == other.dynamite
            && self.doors_opened == other.doors_opened
            && self.trees_chopped == other.trees_chopped
            && self.tiles_blown == other.tiles_blown
    }

    pub fn signature(&self) -> StateSignature {
        StateSignature {
            pos: self.pos,
            facing: self.facing,
            has_axe: self.has_axe,
            has_key: self.has_key,
            has_raft: self.has_raft,
            has_treasure: self.has_treasure,
            dynamite: self.dynamite,
            doors_opened: self.doors_opened.clone(),
            trees_chopped: self.trees_chopped.clone(),
            tiles_blown: self.tiles_blown.clone(),
        }
    }

    /// Integrate one 5x5 perception window. Window coordinates rotate into
    /// absolute map coordinates according to the current facing; the center
    /// cell is the agent itself and is only initialized to open land if the
    /// position was never seen (i.e. on the start tile).
    pub fn apply_view(&mut self, view: &View) -> Result<(), StateError> {
        let mut updated = Vec::with_capacity(24);
        {
            let map = Rc::make_mut(&mut self.map);
            for (i, row_cells) in view.iter().enumerate() {
                for (j, &ch) in row_cells.iter().enumerate() {
                    let span = (VIEW_RANGE * 2) as usize;
                    let (row, col) = match self.facing {
                        Direction::North => (i, j),
                        Direction::West => (span - j, i),
                        Direction::East => (j, span - i),
                        Direction::South => (span - i, span - j),
                    };
                    let cell = Position::new(
                        self.pos.x - VIEW_RANGE + col as i32,
                        self.pos.y - VIEW_RANGE + row as i32,
                    );

                    if i == 2 && j == 2 {
                        if map.get(&cell).is_none() {
                            map.set_percept(cell, ' ')?;
                        }
                    } else {
                        map.set_percept(cell, ch)?;
                        updated.push(cell);
                    }
                }
            }
        }

        for cell in updated {
            self.register_discovery(cell);
        }
        Ok(())
    }

    /// Register a perceived cell in the discovery lists, deduplicated by
    /// position and kind. Re-perceiving the same window leaves the lists
    /// unchanged.
    fn register_discovery(&mut self, cell: Position) {
        let Some(tile) = self.map.get(&cell).copied() else {
            return;
        };

        match tile.item {
            Some(Item::Treasure) => {
                if !self
                    .known_treasures
                    .iter()
                    .any(|t| t.pos == cell && t.item == tile.item)
                {
                    trace!(x = cell.x, y = cell.y, "discovered treasure");
                    self.known_treasures.push(tile);
                }
            }
            Some(item) => {
                if !self
                    .known_items
                    .iter()
                    .any(|t| t.pos == cell && t.item == tile.item)
                {
                    trace!(x = cell.x, y = cell.y, ?item, "discovered item");
                    self.known_items.push(tile);
                }
            }
            None => {}
        }

        if tile.terrain == Terrain::Tree && !self.known_trees.iter().any(|t| t.pos == cell) {
            trace!(x = cell.x, y = cell.y, "discovered tree");
            self.known_trees.push(tile);
        }
    }

    /// The sole state-transition function, used by the live agent and by
    /// search expansion alike. Blocked moves are silent no-ops. `mode` only
    /// matters for `Hypothetical` searches, which may chop/unlock/detonate
    /// without the tool in inventory.
    pub fn apply(&mut self, action: Action, mode: SearchMode) -> Result<(), StateError> {
        match action {
            Action::TurnLeft => {
                self.facing = self.facing.left();
                Ok(())
            }
            Action::TurnRight => {
                self.facing = self.facing.right();
                Ok(())
            }
            Action::Forward => self.move_forward(),
            Action::Chop => self.chop(mode),
            Action::Unlock => self.unlock(mode),
            Action::Detonate => self.detonate(mode),
            Action::Rest => Ok(()),
        }
    }

    fn move_forward(&mut self) -> Result<(), StateError> {
        let next = self.forward_pos();
        let Some(tile) = self.map.get(&next).copied() else {
            // Unseen ahead: never planned into, treat as blocked.
            return Ok(());
        };
        if tile.terrain.blocks_movement() {
            trace!(?tile.terrain, "forward blocked");
            return Ok(());
        }

        // The raft is lost coming ashore, not going out on the water.
        if self.current_terrain() == Terrain::Water
            && tile.terrain == Terrain::Land
            && self.has_raft
        {
            self.has_raft = false;
        }
        self.pos = next;

        if let Some(item) = tile.item {
            self.collect(item, next)?;
        }
        Ok(())
    }

    fn collect(&mut self, item: Item, at: Position) -> Result<(), StateError> {
        match item {
            Item::Axe => self.has_axe = true,
            Item::Key => self.has_key = true,
            Item::Dynamite => self.dynamite += 1,
            Item::Treasure => self.has_treasure = true,
        }

        let ledger = match item {
            Item::Treasure => &mut self.known_treasures,
            _ => &mut self.known_items,
        };
        let name = if item == Item::Treasure {
            "treasures"
        } else {
            "items"
        };
        take_known(ledger, at, name)?;

        if let Some(tile) = Rc::make_mut(&mut self.map).get_mut(&at) {
            tile.item = None;
        }
        trace!(?item, x = at.x, y = at.y, "collected item");
        Ok(())
    }

    fn chop(&mut self, mode: SearchMode) -> Result<(), StateError> {
        let next = self.forward_pos();
        let Some(tile) = self.map.get(&next) else {
            return Ok(());
        };
        if tile.terrain != Terrain::Tree || !(self.has_axe || mode.assumes_tools()) {
            return Ok(());
        }

        self.has_raft = true;
        self.trees_chopped.insert(next);
        take_known(&mut self.known_trees, next, "trees")?;
        if let Some(tile) = Rc::make_mut(&mut self.map).get_mut(&next) {
            tile.terrain = Terrain::Land;
        }
        trace!(x = next.x, y = next.y, "chopped tree");
        Ok(())
    }

    fn unlock(&mut self, mode: SearchMode) -> Result<(), StateError> {
        let next = self.forward_pos();
        let Some(tile) = self.map.get(&next) else {
            return Ok(());
        };
        if tile.terrain != Terrain::Door || !(self.has_key || mode.assumes_tools()) {
            return Ok(());
        }

        self.doors_opened.insert(next);
        if let Some(tile) = Rc::make_mut(&mut self.map).get_mut(&next) {
            tile.terrain = Terrain::Land;
        }
        trace!(x = next.x, y = next.y, "unlocked door");
        Ok(())
    }

    fn detonate(&mut self, mode: SearchMode) -> Result<(), StateError> {
        if !(self.has_dynamite() || mode.assumes_tools()) {
            return Ok(());
        }
        let next = self.forward_pos();
        let Some(tile) = self.map.get(&next).copied() else {
            return Ok(());
        };
        if !tile.terrain.destructible() {
            return Ok(());
        }

        // Saturating: Hypothetical searches may detonate with zero dynamite.
        self.dynamite = self.dynamite.saturating_sub(1);
        if tile.terrain == Terrain::Tree {
            take_known(&mut self.known_trees, next, "trees")?;
        }
        self.tiles_blown.insert(next);
        if let Some(tile) = Rc::make_mut(&mut self.map).get_mut(&next) {
            tile.terrain = Terrain::Land;
        }
        trace!(x = next.x, y = next.y, "blew up tile");
        Ok(())
    }
}

fn take_known(
    list: &mut Vec<Tile>,
    pos: Position,
    ledger: &'static str,
) -> Result<Tile, StateError> {
    match list.iter().position(|tile| tile.pos == pos) {
        Some(index) => Ok(list.remove(index)),
        None => Err(StateError::DiscoveryLedgerMismatch { ledger, pos }),
    }
}
