#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn step(&self, facing: Direction) -> Position {
        let (dx, dy) = facing.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Cardinal facing. y grows southward, so North is y - 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    North,
    West,
    South,
}

impl Direction {
    fn index(self) -> u8 {
        match self {
            Direction::East => 0,
            Direction::North => 1,
            Direction::West => 2,
            Direction::South => 3,
        }
    }

    fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Direction::East,
            1 => Direction::North,
            2 => Direction::West,
            _ => Direction::South,
        }
    }

    pub fn left(self) -> Self {
        Direction::from_index(self.index() + 1)
    }

    pub fn right(self) -> Self {
        Direction::from_index(self.index() + 3)
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::North => (0, -1),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
        }
    }
}

/// The action alphabet sent back to the game, one character per step.
/// `Rest` is the do-nothing sentinel for exhausted-options fallbacks; the
/// search engine never emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    TurnLeft,
    TurnRight,
    Chop,
    Unlock,
    Detonate,
    Rest,
}

impl Action {
    pub fn as_char(self) -> char {
        match self {
            Action::Forward => 'f',
            Action::TurnLeft => 'l',
            Action::TurnRight => 'r',
            Action::Chop => 'c',
            Action::Unlock => 'u',
            Action::Detonate => 'b',
            Action::Rest => '0',
        }
    }
}

/// The 5x5 perception window, row 0 furthest ahead of the agent.
/// The center cell is the agent's own position and carries no information.
pub type View = [[char; 5]; 5];

pub const VIEW_RANGE: i32 = 2;
