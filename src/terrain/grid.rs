use super::coordinates::Coordinate;
use derive_more::Display;
use tracing::trace;

/// Height state of one gameplay square.
///
/// `Unplayable` marks a slope/rock framing a height discontinuity. It is a
/// distinct variant rather than a magic height constant, so it can never
/// collide with a real height or leak into height-difference arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Square {
    /// Flat, walkable square at the given height.
    #[display("{_0}")]
    Playable(i32),
    /// Sloped square; its geometry comes from the neighboring playable squares.
    #[display("unplayable")]
    Unplayable,
}

impl Square {
    pub fn is_playable(self) -> bool {
        matches!(self, Square::Playable(_))
    }

    pub fn height(self) -> Option<i32> {
        match self {
            Square::Playable(height) => Some(height),
            Square::Unplayable => None,
        }
    }
}

/// Owns the square-height array and the derived corner-height array.
///
/// Squares are stored row-major, `size_x * size_y`; corners are row-major,
/// `(size_x + 1) * (size_y + 1)`. Created flat (all playable at height 0).
/// Bounds-checking is the caller's responsibility on every write path.
#[derive(Debug, Clone)]
pub struct Grid {
    size_x: i32,
    size_y: i32,
    squares: Vec<Square>,
    corners: Vec<i32>,
}

impl Grid {
    pub fn new(size_x: i32, size_y: i32) -> Self {
        Self {
            size_x,
            size_y,
            squares: vec![Square::Playable(0); (size_x * size_y) as usize],
            corners: vec![0; ((size_x + 1) * (size_y + 1)) as usize],
        }
    }

    pub fn size_x(&self) -> i32 {
        self.size_x
    }

    pub fn size_y(&self) -> i32 {
        self.size_y
    }

    pub fn contains(&self, pos: Coordinate) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size_x && pos.y < self.size_y
    }

    pub fn square(&self, pos: Coordinate) -> Square {
        self.squares[self.square_index(pos)]
    }

    /// Corner heights cover the inclusive range `[0, size_x] x [0, size_y]`.
    pub fn corner(&self, x: i32, y: i32) -> i32 {
        self.corners[self.corner_index(x, y)]
    }

    /// Low-level square write.
    ///
    /// Returns false without side effects when the square already holds
    /// `square`; the propagation cascade relies on this to terminate.
    ///
    /// A playable write flattens the square's four corners to its height and
    /// marks every differing Moore neighbor unplayable (the marking calls do
    /// no marking of their own, so it stays one level deep). An unplayable
    /// write leaves the corners to the neighboring playable squares that
    /// caused it.
    ///
    /// Panics if an unplayable square ends up with four equal corners: that
    /// would be an isolated rock with no actual slope, which correct
    /// propagation can never produce.
    pub fn write_square(&mut self, pos: Coordinate, square: Square) -> bool {
        let index = self.square_index(pos);
        if self.squares[index] == square {
            return false;
        }
        self.squares[index] = square;
        trace!("square {pos} set to {square}");

        match square {
            Square::Playable(height) => {
                self.flatten_corners(pos, height);
                self.mark_steep_neighbors(pos, square);
            }
            Square::Unplayable => {
                let (a, b, c, d) = self.corner_quad(pos);
                assert!(
                    !(a == b && b == c && c == d),
                    "internal consistency violation: unplayable square at {pos} \
                     has flat corner geometry (height {a})"
                );
            }
        }
        true
    }

    fn flatten_corners(&mut self, pos: Coordinate, height: i32) {
        for (x, y) in [
            (pos.x, pos.y),
            (pos.x + 1, pos.y),
            (pos.x + 1, pos.y + 1),
            (pos.x, pos.y + 1),
        ] {
            let index = self.corner_index(x, y);
            self.corners[index] = height;
        }
    }

    fn mark_steep_neighbors(&mut self, pos: Coordinate, square: Square) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = Coordinate::new(pos.x + dx, pos.y + dy);
                if self.contains(neighbor) && self.square(neighbor) != square {
                    self.write_square(neighbor, Square::Unplayable);
                }
            }
        }
    }

    fn corner_quad(&self, pos: Coordinate) -> (i32, i32, i32, i32) {
        (
            self.corner(pos.x, pos.y),
            self.corner(pos.x + 1, pos.y),
            self.corner(pos.x + 1, pos.y + 1),
            self.corner(pos.x, pos.y + 1),
        )
    }

    fn square_index(&self, pos: Coordinate) -> usize {
        (pos.y * self.size_x + pos.x) as usize
    }

    fn corner_index(&self, x: i32, y: i32) -> usize {
        (y * (self.size_x + 1) + x) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_flat() {
        let grid = Grid::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(grid.square(Coordinate::new(x, y)), Square::Playable(0));
            }
        }
        for y in 0..=3 {
            for x in 0..=4 {
                assert_eq!(grid.corner(x, y), 0);
            }
        }
    }

    #[test]
    fn test_unchanged_write_is_a_noop() {
        let mut grid = Grid::new(3, 1);
        assert!(!grid.write_square(Coordinate::new(0, 0), Square::Playable(0)));
        assert_eq!(grid.square(Coordinate::new(0, 0)), Square::Playable(0));
    }

    #[test]
    fn test_playable_write_flattens_corners() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.write_square(Coordinate::new(1, 1), Square::Playable(2)));
        assert_eq!(grid.corner(1, 1), 2);
        assert_eq!(grid.corner(2, 1), 2);
        assert_eq!(grid.corner(2, 2), 2);
        assert_eq!(grid.corner(1, 2), 2);
        // far corners untouched
        assert_eq!(grid.corner(0, 0), 0);
        assert_eq!(grid.corner(3, 3), 0);
    }

    #[test]
    fn test_moore_marking_is_one_level_deep() {
        let mut grid = Grid::new(5, 5);
        grid.write_square(Coordinate::new(2, 2), Square::Playable(1));

        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = Coordinate::new(2 + dx, 2 + dy);
                assert_eq!(grid.square(neighbor), Square::Unplayable, "at {neighbor}");
            }
        }
        // the ring at distance 2 is untouched
        for x in 0..5 {
            assert_eq!(grid.square(Coordinate::new(x, 0)), Square::Playable(0));
            assert_eq!(grid.square(Coordinate::new(x, 4)), Square::Playable(0));
        }
    }

    #[test]
    fn test_equal_neighbor_is_not_marked() {
        let mut grid = Grid::new(3, 1);
        grid.write_square(Coordinate::new(0, 0), Square::Playable(1));
        assert_eq!(grid.square(Coordinate::new(1, 0)), Square::Unplayable);

        grid.write_square(Coordinate::new(1, 0), Square::Playable(1));
        // (0,0) already holds the same height and stays put
        assert_eq!(grid.square(Coordinate::new(0, 0)), Square::Playable(1));
        assert_eq!(grid.square(Coordinate::new(1, 0)), Square::Playable(1));
    }

    #[test]
    #[should_panic(expected = "internal consistency violation")]
    fn test_flat_cornered_unplayable_square_is_fatal() {
        let mut grid = Grid::new(3, 3);
        // no neighboring slope ever established geometry here
        grid.write_square(Coordinate::new(1, 1), Square::Unplayable);
    }
}
