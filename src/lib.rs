pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};
pub use config::HotelConfig;

pub use adapters::{csv_store::CsvStore, memory::MemoryStore};
pub use crate::core::{
    Block, BlockRoom, DateRange, DateRanged, HotelStore, Reservation, ReservationManager, Room,
    RoomStatus,
};
pub use domain::date_range::validate_date;
pub use domain::model::MAX_BLOCK_ROOMS;
pub use utils::error::{HotelError, Result};
pub use utils::validation::validate_id;
