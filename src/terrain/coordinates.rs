use derive_more::Display;

/// Grid position (signed so that offset math can step off the grid;
/// callers bounds-check before any array access)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("({x},{y})")]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

/// The four axis directions, in the order every walk and cascade uses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    West,
    South,
    East,
}

pub const AXIS_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::West,
    Direction::South,
    Direction::East,
];

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// North is y+
    pub fn north(self, distance: i32) -> Self {
        Self::new(self.x, self.y + distance)
    }

    /// West is x-
    pub fn west(self, distance: i32) -> Self {
        Self::new(self.x - distance, self.y)
    }

    /// South is y-
    pub fn south(self, distance: i32) -> Self {
        Self::new(self.x, self.y - distance)
    }

    /// East is x+
    pub fn east(self, distance: i32) -> Self {
        Self::new(self.x + distance, self.y)
    }

    pub fn step(self, direction: Direction, distance: i32) -> Self {
        match direction {
            Direction::North => self.north(distance),
            Direction::West => self.west(distance),
            Direction::South => self.south(distance),
            Direction::East => self.east(distance),
        }
    }
}
