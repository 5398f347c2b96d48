use std::collections::HashMap;

use crate::error::StateError;
use crate::tile::{Item, Terrain, Tile};
use crate::types::{Position, VIEW_RANGE};

/// Sparse grid of perceived tiles. A position with no entry has never been
/// seen. Cloning is a full deep copy: every tile is owned, no shared mutable
/// state survives the copy.
#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    tiles: HashMap<Position, Tile>,
}

impl WorldMap {
    pub fn new() -> Self {
        Self {
            tiles: HashMap::new(),
        }
    }

    pub fn get(&self, pos: &Position) -> Option<&Tile> {
        self.tiles.get(pos)
    }

    pub fn get_mut(&mut self, pos: &Position) -> Option<&mut Tile> {
        self.tiles.get_mut(pos)
    }

    pub fn insert(&mut self, tile: Tile) {
        self.tiles.insert(tile.pos, tile);
    }

    /// Create the tile if the cell was unseen, otherwise update terrain and
    /// item in place from the raw perception character.
    pub fn set_percept(&mut self, pos: Position, ch: char) -> Result<(), StateError> {
        let terrain = Terrain::from_char(ch, pos)?;
        let item = Item::from_char(ch, pos)?;
        match self.tiles.get_mut(&pos) {
            Some(tile) => {
                tile.terrain = terrain;
                tile.item = item;
            }
            None => {
                self.tiles.insert(pos, Tile { terrain, item, pos });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &Tile)> {
        self.tiles.iter()
    }

    /// Count never-perceived cells in the 5x5 perceptual footprint around
    /// `center`. Exploration search treats any position with a nonzero count
    /// as a goal.
    pub fn unseen_around(&self, center: Position) -> usize {
        let mut unseen = 0;
        for dy in -VIEW_RANGE..=VIEW_RANGE {
            for dx in -VIEW_RANGE..=VIEW_RANGE {
                let pos = Position::new(center.x + dx, center.y + dy);
                if !self.tiles.contains_key(&pos) {
                    unseen += 1;
                }
            }
        }
        unseen
    }
}
