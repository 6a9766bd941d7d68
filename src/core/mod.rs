pub mod manager;

pub use crate::domain::date_range::{DateRange, DateRanged};
pub use crate::domain::model::{Block, BlockRoom, Reservation, Room, RoomStatus};
pub use crate::domain::ports::{BlockStore, HotelStore, ReservationStore, RoomCatalogStore};
pub use crate::utils::error::Result;
pub use manager::ReservationManager;
