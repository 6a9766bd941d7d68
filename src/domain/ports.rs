use crate::domain::model::{Block, Reservation, Room};
use crate::utils::error::Result;

/// Source of the room catalog and sink for room rate changes.
pub trait RoomCatalogStore {
    fn load_rooms(&self) -> Result<Vec<Room>>;
    fn save_rates(&self, rooms: &[Room]) -> Result<()>;
}

/// Reservations are always written as a whole list (overwrite, never append).
pub trait ReservationStore {
    fn load_reservations(&self) -> Result<Vec<Reservation>>;
    fn save_reservations(&self, reservations: &[Reservation]) -> Result<()>;
}

pub trait BlockStore {
    fn load_blocks(&self) -> Result<Vec<Block>>;
    fn save_blocks(&self, blocks: &[Block]) -> Result<()>;
}

pub trait HotelStore: RoomCatalogStore + ReservationStore + BlockStore {}

impl<T: RoomCatalogStore + ReservationStore + BlockStore> HotelStore for T {}
