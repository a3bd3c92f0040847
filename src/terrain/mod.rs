use crate::config::Config;
use crate::errors::{LandscapeError, LandscapeResult};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::collections::VecDeque;
use tracing::{debug, trace};

pub mod constants;
pub mod coordinates;
pub mod grid;
mod propagation;

use constants::{MIN_PATCH_SIZE, WALK_EAST, WALK_NORTH, WALK_SOUTH, WALK_WEST};
use coordinates::Coordinate;
use grid::{Grid, Square};

/// Procedural landscape generator.
///
/// Owns a grid of square heights plus the derived corner heights, and layers
/// randomly grown patches onto it. Every patch write goes through the
/// constraint cascade, so the grid always satisfies the gameplay rules:
/// bounded height steps between playable squares, unplayable rock framing
/// every discontinuity, and same-height regions merged across one-square
/// gaps.
///
/// The random source is owned and reseeded explicitly per `generate` call,
/// never shared: equal dimensions, config, and seed produce bit-identical
/// grids.
#[derive(Debug)]
pub struct Landscape {
    config: Config,
    grid: Grid,
    rng: Pcg64,
}

impl Landscape {
    /// Create a generator over a flat grid (all squares playable at height 0).
    pub fn new(size_x: i32, size_y: i32, config: Config) -> LandscapeResult<Self> {
        if size_x <= 0 || size_y <= 0 {
            return Err(LandscapeError::InvalidDimensions { size_x, size_y });
        }
        config.ensure_valid()?;
        Ok(Self {
            config,
            grid: Grid::new(size_x, size_y),
            rng: Pcg64::seed_from_u64(0),
        })
    }

    pub fn size_x(&self) -> i32 {
        self.grid.size_x()
    }

    pub fn size_y(&self) -> i32 {
        self.grid.size_y()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Layer one run of patches onto the grid.
    ///
    /// Reseeds the owned random source, then performs a rolled number of
    /// patch-growth attempts. The grid is not reset first; repeated calls
    /// keep stacking changes. Internal invariant violations abort with a
    /// panic rather than returning a misleading grid.
    pub fn generate(&mut self, seed: u64) {
        self.rng = Pcg64::seed_from_u64(seed);
        if self.config.max_height == 0 {
            debug!("max_height is 0, nothing to generate");
            return;
        }

        let mut remaining = roll(&mut self.rng, self.config.changes_count)
            + self.config.changes_count / 2;
        debug!(
            "requested changes {}, planned changes {remaining}",
            self.config.changes_count
        );

        while remaining > 0 {
            // a failed attempt rolled a height the origin already has; retry
            // with fresh rolls
            if self.perform_change(remaining) {
                remaining -= 1;
            }
        }
    }

    /// Grow one patch of random height at a random origin.
    ///
    /// Returns false when the rolled origin already holds the rolled height,
    /// leaving the grid untouched.
    fn perform_change(&mut self, remaining: i32) -> bool {
        let origin = Coordinate::new(
            roll(&mut self.rng, self.grid.size_x()),
            roll(&mut self.rng, self.grid.size_y()),
        );
        let magnitude = roll(&mut self.rng, self.config.max_height) + 1;
        let height = if self.rng.gen_bool(0.5) {
            magnitude
        } else {
            -magnitude
        };
        // tall patches grow smaller; late patches grow a little larger to
        // make up for the shrinking pool of uncommitted squares
        let mut patch_size =
            roll(&mut self.rng, self.config.max_patch_size) / magnitude + MIN_PATCH_SIZE + remaining;
        trace!("patch plan - height={height}, patch_size={patch_size}, origin={origin}");

        if !self.apply_change(origin, height) {
            return false;
        }

        let target = Square::Playable(height);
        let mut todo = VecDeque::new();
        todo.push_back(origin);

        while patch_size > 0 {
            let Some(pos) = todo.pop_front() else {
                trace!("finishing patch prematurely with left patch_size {patch_size}");
                break;
            };
            if self.apply_change(pos, height) {
                patch_size -= 1;
            }

            let where_next = roll(&mut self.rng, 16);
            for (bit, neighbor) in [
                (WALK_NORTH, pos.north(1)),
                (WALK_WEST, pos.west(1)),
                (WALK_SOUTH, pos.south(1)),
                (WALK_EAST, pos.east(1)),
            ] {
                if where_next & bit != 0
                    && self.grid.contains(neighbor)
                    && self.grid.square(neighbor) != target
                {
                    todo.push_back(neighbor);
                }
            }
        }
        true
    }

    fn apply_change(&mut self, pos: Coordinate, height: i32) -> bool {
        propagation::apply_change(
            &mut self.grid,
            pos,
            height,
            self.config.max_height_difference,
        )
    }

    /// Bounds-checked read of a square's height state.
    pub fn square_height(&self, x: i32, y: i32) -> LandscapeResult<Square> {
        let pos = Coordinate::new(x, y);
        if !self.grid.contains(pos) {
            return Err(LandscapeError::PositionOutOfRange {
                x,
                y,
                max_x: self.grid.size_x(),
                max_y: self.grid.size_y(),
            });
        }
        Ok(self.grid.square(pos))
    }

    /// Bounds-checked read of a corner height over the inclusive
    /// `(size_x + 1) x (size_y + 1)` corner grid - the one interface a
    /// mesh-building consumer needs.
    pub fn corner_height(&self, x: i32, y: i32) -> LandscapeResult<i32> {
        if x < 0 || y < 0 || x > self.grid.size_x() || y > self.grid.size_y() {
            return Err(LandscapeError::PositionOutOfRange {
                x,
                y,
                max_x: self.grid.size_x() + 1,
                max_y: self.grid.size_y() + 1,
            });
        }
        Ok(self.grid.corner(x, y))
    }
}

/// Uniform roll in `[0, bound)`; 0 when the range is empty.
fn roll(rng: &mut Pcg64, bound: i32) -> i32 {
    if bound <= 0 {
        0
    } else {
        rng.gen_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(landscape: &Landscape) -> (Vec<Square>, Vec<i32>) {
        let mut squares = Vec::new();
        for y in 0..landscape.size_y() {
            for x in 0..landscape.size_x() {
                squares.push(landscape.square_height(x, y).unwrap());
            }
        }
        let mut corners = Vec::new();
        for y in 0..=landscape.size_y() {
            for x in 0..=landscape.size_x() {
                corners.push(landscape.corner_height(x, y).unwrap());
            }
        }
        (squares, corners)
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let config = Config::new(3, 1, 30, 20).unwrap();
        let mut a = Landscape::new(16, 16, config).unwrap();
        let mut b = Landscape::new(16, 16, config).unwrap();
        a.generate(42);
        b.generate(42);
        assert_eq!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_different_seeds_diverge() {
        let config = Config::new(3, 1, 30, 20).unwrap();
        let mut a = Landscape::new(16, 16, config).unwrap();
        let mut b = Landscape::new(16, 16, config).unwrap();
        a.generate(1);
        b.generate(2);
        assert_ne!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_repeated_generate_layers_instead_of_resetting() {
        let config = Config::new(3, 1, 30, 20).unwrap();
        let mut once = Landscape::new(16, 16, config).unwrap();
        once.generate(1);
        let after_one = snapshot(&once);

        let mut twice = Landscape::new(16, 16, config).unwrap();
        twice.generate(1);
        twice.generate(2);
        assert_ne!(snapshot(&twice), after_one);

        // and the layered result is itself deterministic
        let mut twice_again = Landscape::new(16, 16, config).unwrap();
        twice_again.generate(1);
        twice_again.generate(2);
        assert_eq!(snapshot(&twice), snapshot(&twice_again));
    }

    #[test]
    fn test_zero_changes_count_leaves_grid_flat() {
        let config = Config::new(3, 1, 30, 0).unwrap();
        let mut landscape = Landscape::new(8, 8, config).unwrap();
        landscape.generate(7);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(landscape.square_height(x, y).unwrap(), Square::Playable(0));
            }
        }
    }

    #[test]
    fn test_zero_max_height_leaves_grid_flat() {
        let config = Config::new(0, 1, 30, 20).unwrap();
        let mut landscape = Landscape::new(8, 8, config).unwrap();
        landscape.generate(7);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(landscape.square_height(x, y).unwrap(), Square::Playable(0));
            }
        }
    }

    #[test]
    fn test_generated_grid_upholds_invariants() {
        let config = Config::new(4, 2, 40, 30).unwrap();
        let mut landscape = Landscape::new(24, 24, config).unwrap();
        landscape.generate(1234);

        for y in 0..24 {
            for x in 0..24 {
                let corners = [
                    landscape.corner_height(x, y).unwrap(),
                    landscape.corner_height(x + 1, y).unwrap(),
                    landscape.corner_height(x + 1, y + 1).unwrap(),
                    landscape.corner_height(x, y + 1).unwrap(),
                ];
                match landscape.square_height(x, y).unwrap() {
                    Square::Playable(height) => {
                        assert!(
                            height.abs() <= config.max_height,
                            "square ({x},{y}) height {height} exceeds max"
                        );
                        assert_eq!(
                            corners,
                            [height; 4],
                            "playable square ({x},{y}) is not flat"
                        );
                    }
                    Square::Unplayable => {
                        assert!(
                            corners.iter().any(|&c| c != corners[0]),
                            "unplayable square ({x},{y}) has flat corners"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_square_query_bounds() {
        let config = Config::new(1, 1, 1, 1).unwrap();
        let landscape = Landscape::new(4, 3, config).unwrap();
        assert!(landscape.square_height(0, 0).is_ok());
        assert!(landscape.square_height(3, 2).is_ok());
        assert!(landscape.square_height(-1, 0).is_err());
        assert!(landscape.square_height(4, 0).is_err());
        assert!(landscape.square_height(0, 3).is_err());
    }

    #[test]
    fn test_corner_query_bounds_are_inclusive() {
        let config = Config::new(1, 1, 1, 1).unwrap();
        let landscape = Landscape::new(4, 3, config).unwrap();
        assert!(landscape.corner_height(0, 0).is_ok());
        assert!(landscape.corner_height(4, 3).is_ok());
        assert!(landscape.corner_height(5, 0).is_err());
        assert!(landscape.corner_height(0, 4).is_err());
        assert!(landscape.corner_height(-1, -1).is_err());
    }

    #[test]
    fn test_rejects_invalid_dimensions() {
        let config = Config::new(1, 1, 1, 1).unwrap();
        assert!(matches!(
            Landscape::new(0, 8, config),
            Err(LandscapeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Landscape::new(8, -1, config),
            Err(LandscapeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rejects_literal_config_with_negative_field() {
        let config = Config {
            max_height: 3,
            max_height_difference: 1,
            max_patch_size: -5,
            changes_count: 10,
        };
        let err = Landscape::new(8, 8, config).unwrap_err();
        assert!(err.to_string().contains("max_patch_size"));
    }
}
