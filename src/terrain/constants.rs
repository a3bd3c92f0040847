/// Constants for landscape generation
/// Every patch grows to at least this many squares before random rolls add more
pub const MIN_PATCH_SIZE: i32 = 5;

/// Random-walk direction bits, rolled fresh for every popped queue entry
pub const WALK_NORTH: i32 = 1; // y++
pub const WALK_WEST: i32 = 2; // x--
pub const WALK_SOUTH: i32 = 4; // y--
pub const WALK_EAST: i32 = 8; // x++
