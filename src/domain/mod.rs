/// Pure simulation vocabulary: vectors, the hero and its hitbox, tiles.
/// Nothing in here touches I/O.

pub mod hero;
pub mod hitbox;
pub mod tile;
pub mod vector;
