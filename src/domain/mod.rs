// Domain layer: rooms, stays, reservations, blocks and the store ports they persist through.

pub mod date_range;
pub mod model;
pub mod ports;
