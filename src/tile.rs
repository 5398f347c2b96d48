use crate::error::StateError;
use crate::types::Position;

/// Fixed environment category of a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Land,
    Water,
    Tree,
    Door,
    Wall,
    /// Edge-of-map marker perceived at the world boundary.
    OffMap,
}

impl Terrain {
    /// Normalize a raw perception character. The item characters denote a
    /// collectible standing on open land. An unrecognized character is an
    /// error, never a silent default.
    pub fn from_char(ch: char, pos: Position) -> Result<Self, StateError> {
        match ch.to_ascii_lowercase() {
            ' ' | 'a' | 'k' | 'd' | '$' => Ok(Terrain::Land),
            '~' => Ok(Terrain::Water),
            't' => Ok(Terrain::Tree),
            '-' => Ok(Terrain::Door),
            '*' => Ok(Terrain::Wall),
            '.' => Ok(Terrain::OffMap),
            ch => Err(StateError::InvalidTileKind { ch, pos }),
        }
    }

    /// Hard obstacles a forward move bounces off.
    pub fn blocks_movement(self) -> bool {
        matches!(self, Terrain::Wall | Terrain::Door | Terrain::OffMap)
    }

    /// Tiles dynamite can clear.
    pub fn destructible(self) -> bool {
        matches!(self, Terrain::Wall | Terrain::Tree | Terrain::Door)
    }
}

/// Collectible occupying a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Axe,
    Key,
    Dynamite,
    Treasure,
}

impl Item {
    pub fn from_char(ch: char, pos: Position) -> Result<Option<Self>, StateError> {
        match ch.to_ascii_lowercase() {
            'a' => Ok(Some(Item::Axe)),
            'k' => Ok(Some(Item::Key)),
            'd' => Ok(Some(Item::Dynamite)),
            '$' => Ok(Some(Item::Treasure)),
            ' ' | '~' | 't' | '-' | '*' | '.' => Ok(None),
            ch => Err(StateError::InvalidTileKind { ch, pos }),
        }
    }
}

/// One perceived map cell. Created when first seen, mutated in place when
/// chopping, unlocking, detonating or pickup changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub terrain: Terrain,
    pub item: Option<Item>,
    pub pos: Position,
}

impl Tile {
    pub fn from_percept(ch: char, pos: Position) -> Result<Self, StateError> {
        Ok(Self {
            terrain: Terrain::from_char(ch, pos)?,
            item: Item::from_char(ch, pos)?,
            pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percept_characters_normalize() {
        let pos = Position::new(1, 1);

        let land = Tile::from_percept(' ', pos).unwrap();
        assert_eq!(land.terrain, Terrain::Land);
        assert_eq!(land.item, None);

        let axe = Tile::from_percept('a', pos).unwrap();
        assert_eq!(axe.terrain, Terrain::Land);
        assert_eq!(axe.item, Some(Item::Axe));

        let treasure = Tile::from_percept('$', pos).unwrap();
        assert_eq!(treasure.terrain, Terrain::Land);
        assert_eq!(treasure.item, Some(Item::Treasure));

        assert_eq!(
            Tile::from_percept('~', pos).unwrap().terrain,
            Terrain::Water
        );
        assert_eq!(Tile::from_percept('t', pos).unwrap().terrain, Terrain::Tree);
        assert_eq!(Tile::from_percept('-', pos).unwrap().terrain, Terrain::Door);
        assert_eq!(Tile::from_percept('*', pos).unwrap().terrain, Terrain::Wall);
        assert_eq!(
            Tile::from_percept('.', pos).unwrap().terrain,
            Terrain::OffMap
        );
    }

    #[test]
    fn test_parsing_is_case_insensitive() {
        let pos = Position::new(0, 0);
        assert_eq!(Tile::from_percept('T', pos).unwrap().terrain, Terrain::Tree);
        assert_eq!(
            Tile::from_percept('K', pos).unwrap().item,
            Some(Item::Key)
        );
    }

    #[test]
    fn test_unrecognized_character_is_an_error() {
        let pos = Position::new(7, -3);
        let err = Tile::from_percept('x', pos).unwrap_err();
        assert_eq!(err, StateError::InvalidTileKind { ch: 'x', pos });
    }

    #[test]
    fn test_tile_equality_covers_all_fields() {
        let a = Tile::from_percept('k', Position::new(1, 2)).unwrap();
        let b = Tile::from_percept('k', Position::new(1, 2)).unwrap();
        let c = Tile::from_percept('k', Position::new(2, 1)).unwrap();
        let d = Tile::from_percept('a', Position::new(1, 2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
