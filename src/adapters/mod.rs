// Adapters layer: concrete store backends for the domain ports.

pub mod csv_store;
pub mod memory;
