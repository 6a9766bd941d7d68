use crate::domain::model::{Block, Reservation, Room};
use crate::domain::ports::{BlockStore, ReservationStore, RoomCatalogStore};
use crate::utils::error::Result;
use std::cell::RefCell;

/// Keeps everything in process memory. Handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: RefCell<Vec<Room>>,
    reservations: RefCell<Vec<Reservation>>,
    blocks: RefCell<Vec<Block>>,
}

impl MemoryStore {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self {
            rooms: RefCell::new(rooms),
            ..Self::default()
        }
    }

    pub fn saved_rooms(&self) -> Vec<Room> {
        self.rooms.borrow().clone()
    }

    pub fn saved_reservations(&self) -> Vec<Reservation> {
        self.reservations.borrow().clone()
    }

    pub fn saved_blocks(&self) -> Vec<Block> {
        self.blocks.borrow().clone()
    }
}

impl RoomCatalogStore for MemoryStore {
    fn load_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.saved_rooms())
    }

    fn save_rates(&self, rooms: &[Room]) -> Result<()> {
        *self.rooms.borrow_mut() = rooms.to_vec();
        Ok(())
    }
}

impl ReservationStore for MemoryStore {
    fn load_reservations(&self) -> Result<Vec<Reservation>> {
        Ok(self.saved_reservations())
    }

    fn save_reservations(&self, reservations: &[Reservation]) -> Result<()> {
        *self.reservations.borrow_mut() = reservations.to_vec();
        Ok(())
    }
}

impl BlockStore for MemoryStore {
    fn load_blocks(&self) -> Result<Vec<Block>> {
        Ok(self.saved_blocks())
    }

    fn save_blocks(&self, blocks: &[Block]) -> Result<()> {
        *self.blocks.borrow_mut() = blocks.to_vec();
        Ok(())
    }
}
