use super::coordinates::{AXIS_DIRECTIONS, Coordinate};
use super::grid::{Grid, Square};
use tracing::trace;

/// One in-flight fix-up, with a cursor over the directions still to examine.
#[derive(Debug, Clone, Copy)]
struct Cascade {
    pos: Coordinate,
    height: i32,
    next_direction: usize,
}

/// Change a square to a playable height and cascade the fix-ups that keep the
/// grid consistent: clamp neighbors two squares away that now exceed
/// `max_height_difference`, and join same-height regions separated by exactly
/// one square into a flat run.
///
/// Returns false (and does nothing) when the square already holds `height`.
///
/// The cascade is an explicit LIFO worklist rather than mutual recursion, so
/// its depth is never a call-stack concern on large grids. Frames carry a
/// per-direction cursor and every follow-up write happens eagerly, which
/// reproduces the depth-first order of the recursive formulation exactly: a
/// direction's cascade settles before the next direction of the same square
/// is examined.
pub(crate) fn apply_change(
    grid: &mut Grid,
    pos: Coordinate,
    height: i32,
    max_height_difference: i32,
) -> bool {
    if !grid.write_square(pos, Square::Playable(height)) {
        return false;
    }

    let mut work = vec![Cascade {
        pos,
        height,
        next_direction: 0,
    }];
    let mut steps = cascade_step_cap(grid);

    while let Some(frame) = work.last_mut() {
        assert!(
            steps > 0,
            "internal consistency violation: cascade failed to settle from {pos}"
        );
        steps -= 1;

        if frame.next_direction == AXIS_DIRECTIONS.len() {
            work.pop();
            continue;
        }
        let direction = AXIS_DIRECTIONS[frame.next_direction];
        frame.next_direction += 1;
        let (pos, height) = (frame.pos, frame.height);

        let next = pos.step(direction, 1);
        let next_next = pos.step(direction, 2);
        if !grid.contains(next) || !grid.contains(next_next) {
            continue;
        }
        if grid.square(next) == Square::Playable(height) {
            // direction already consistent
            continue;
        }
        // slopes are never flattened by the clamp, and can never match the join
        let Some(next2_height) = grid.square(next_next).height() else {
            continue;
        };

        if next2_height - height > max_height_difference {
            chase(grid, &mut work, next_next, height + max_height_difference);
        } else if height - next2_height > max_height_difference {
            chase(grid, &mut work, next_next, height - max_height_difference);
        }
        // independent of the clamp, against the same pre-read value: a
        // same-height square two away turns the one-square gap into a
        // matching flat run
        if next2_height == height {
            chase(grid, &mut work, next, height);
        }
    }
    true
}

/// Write a follow-up change now; only a real change earns a cascade frame.
fn chase(grid: &mut Grid, work: &mut Vec<Cascade>, pos: Coordinate, height: i32) {
    if grid.write_square(pos, Square::Playable(height)) {
        trace!("cascade continues at {pos} with height {height}");
        work.push(Cascade {
            pos,
            height,
            next_direction: 0,
        });
    }
}

/// Step budget backstopping termination. Every cascade write moves a square
/// to a strictly different height and the grid is finite, so the fixed point
/// is reached well inside area x diameter direction checks.
fn cascade_step_cap(grid: &Grid) -> usize {
    let area = (grid.size_x() * grid.size_y()) as usize;
    let diameter = (grid.size_x() + grid.size_y()) as usize;
    4 * area * (diameter + 2)
}
