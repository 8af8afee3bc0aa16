//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod local_instant;

pub use coordinate::{Coordinate, InvalidCoordinates};
pub use local_instant::{parse_compact_local, format_compact_local, COMPACT_LOCAL_FORMAT};
