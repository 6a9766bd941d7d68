use crate::domain::date_range::DateRange;
use crate::domain::model::{Block, BlockRoom, Reservation, Room, RoomStatus};
use crate::domain::ports::HotelStore;
use crate::utils::error::{HotelError, Result};
use crate::utils::validation::{validate_id, validate_room_rate};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Owns the room catalog, every reservation and every block, and keeps the
/// store in step with them. Each mutation is written to the store before it
/// becomes visible in memory, so a failed write leaves the manager unchanged.
pub struct ReservationManager<S: HotelStore> {
    store: S,
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    blocks: Vec<Block>,
    next_reservation_id: u32,
    next_block_id: u32,
}

impl<S: HotelStore> ReservationManager<S> {
    pub fn new(store: S) -> Result<Self> {
        let rooms = store.load_rooms()?;
        let reservations = store.load_reservations()?;
        let blocks = store.load_blocks()?;

        let next_reservation_id = following_id(
            "reservation",
            reservations
                .iter()
                .map(Reservation::reservation_id)
                .max()
                .unwrap_or(0),
        )?;
        let next_block_id = following_id(
            "block",
            blocks.iter().map(Block::block_id).max().unwrap_or(0),
        )?;

        tracing::info!(
            "Loaded {} rooms, {} reservations, {} blocks",
            rooms.len(),
            reservations.len(),
            blocks.len()
        );

        Ok(Self {
            store,
            rooms,
            reservations,
            blocks,
            next_reservation_id,
            next_block_id,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn find_reservation(&self, reservation_id: u32) -> Option<&Reservation> {
        self.reservations
            .iter()
            .find(|reservation| reservation.reservation_id() == reservation_id)
    }

    pub fn find_block(&self, block_id: u32) -> Option<&Block> {
        self.blocks.iter().find(|block| block.block_id() == block_id)
    }

    fn find_room(&self, room_id: u32) -> Option<&Room> {
        self.rooms.iter().find(|room| room.room_id == room_id)
    }

    /// Catalog rooms free for the whole stay, in catalog order.
    ///
    /// A room is taken when one of its reservations overlaps the stay, or when
    /// it belongs to a block overlapping the stay. Block membership alone is
    /// enough, whatever the room's status inside the block.
    pub fn find_available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<Room>> {
        let stay = DateRange::new(check_in, check_out)?;
        let taken = self.taken_room_ids(stay);

        let available: Vec<Room> = self
            .rooms
            .iter()
            .filter(|room| !taken.contains(&room.room_id))
            .cloned()
            .collect();

        tracing::debug!(
            "{} of {} rooms available for {}",
            available.len(),
            self.rooms.len(),
            stay
        );
        Ok(available)
    }

    fn taken_room_ids(&self, stay: DateRange) -> HashSet<u32> {
        let mut taken: HashSet<u32> = stay
            .overlap_blocks_reservations(&self.reservations)
            .into_iter()
            .map(Reservation::room_id)
            .collect();

        for block in stay.overlap_blocks_reservations(&self.blocks) {
            taken.extend(block.room_ids());
        }
        taken
    }

    /// Checks that every room exists and is free for `stay`, failing on the first one that is not.
    fn ensure_rooms_free(&self, room_ids: &[u32], stay: DateRange) -> Result<()> {
        let taken = self.taken_room_ids(stay);

        for &room_id in room_ids {
            if self.find_room(room_id).is_none() {
                return Err(HotelError::InvalidRoom {
                    room_id,
                    reason: "not in the hotel catalog".to_string(),
                });
            }
            if taken.contains(&room_id) {
                tracing::warn!("Room {} is already taken for {}", room_id, stay);
                return Err(HotelError::RoomUnavailable {
                    room_id,
                    check_in: stay.start(),
                    check_out: stay.end(),
                });
            }
        }
        Ok(())
    }

    pub fn reserve(
        &mut self,
        room_id: u32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Reservation> {
        validate_id(room_id)?;
        let stay = DateRange::new(check_in, check_out)?;
        self.ensure_rooms_free(&[room_id], stay)?;

        let rate = self
            .find_room(room_id)
            .map(Room::cost)
            .ok_or_else(|| HotelError::not_found("Room", room_id))?;
        let following = following_id("reservation", self.next_reservation_id)?;
        let reservation = Reservation::new(self.next_reservation_id, room_id, stay, rate);

        let mut reservations = self.reservations.clone();
        reservations.push(reservation.clone());
        self.store.save_reservations(&reservations)?;

        self.reservations = reservations;
        self.next_reservation_id = following;

        tracing::info!(
            "Reservation {} created: room {} for {}",
            reservation.reservation_id(),
            room_id,
            stay
        );
        Ok(reservation)
    }

    /// Reservations occupying a room on the night of `date`: the check-in day
    /// counts, the check-out day does not.
    pub fn list_reservations(&self, date: NaiveDate) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|reservation| reservation.stay().contains(date))
            .collect()
    }

    pub fn total_cost(&self, reservation_id: u32) -> Result<Decimal> {
        validate_id(reservation_id)?;
        self.find_reservation(reservation_id)
            .ok_or_else(|| HotelError::not_found("Reservation", reservation_id))?
            .total_cost()
    }

    pub fn create_block(
        &mut self,
        room_ids: &[u32],
        check_in: NaiveDate,
        check_out: NaiveDate,
        discount_rate: Decimal,
    ) -> Result<Block> {
        for &room_id in room_ids {
            validate_id(room_id)?;
        }
        let stay = DateRange::new(check_in, check_out)?;
        let block = Block::new(self.next_block_id, room_ids, stay, discount_rate)?;
        self.ensure_rooms_free(room_ids, stay)?;
        let following = following_id("block", self.next_block_id)?;

        let mut blocks = self.blocks.clone();
        blocks.push(block.clone());
        self.store.save_blocks(&blocks)?;

        self.blocks = blocks;
        self.next_block_id = following;

        tracing::info!(
            "Block {} created: rooms {:?} for {} at {} discount",
            block.block_id(),
            room_ids,
            stay,
            discount_rate
        );
        Ok(block)
    }

    pub fn check_available_rooms_in_blocks(&self, block_id: u32) -> Result<Vec<BlockRoom>> {
        validate_id(block_id)?;
        self.find_block(block_id)
            .map(Block::check_available_rooms)
            .ok_or_else(|| HotelError::not_found("Block", block_id))
    }

    /// Claims one room of a block as a reservation spanning the block's stay
    /// at the block's discount.
    pub fn reserve_from_block(&mut self, room_id: u32, block_id: u32) -> Result<Reservation> {
        validate_id(room_id)?;
        validate_id(block_id)?;

        let index = self
            .blocks
            .iter()
            .position(|block| block.block_id() == block_id)
            .ok_or_else(|| HotelError::not_found("Block", block_id))?;
        let block = &self.blocks[index];

        match block.status_of(room_id) {
            None => {
                return Err(HotelError::InvalidRoom {
                    room_id,
                    reason: format!("not part of block {}", block_id),
                })
            }
            Some(RoomStatus::Unavailable) => {
                tracing::warn!("Room {} of block {} was already claimed", room_id, block_id);
                return Err(HotelError::RoomUnavailable {
                    room_id,
                    check_in: block.stay().start(),
                    check_out: block.stay().end(),
                });
            }
            Some(RoomStatus::Available) => {}
        }

        let rate = self
            .find_room(room_id)
            .map(Room::cost)
            .ok_or_else(|| HotelError::InvalidRoom {
                room_id,
                reason: "not in the hotel catalog".to_string(),
            })?;

        let following = following_id("reservation", self.next_reservation_id)?;
        let mut updated_block = block.clone();
        updated_block.reserve_room(room_id);
        let reservation =
            Reservation::new(self.next_reservation_id, room_id, block.stay(), rate)
                .from_block(block_id, block.discount_rate());

        let mut reservations = self.reservations.clone();
        reservations.push(reservation.clone());
        let mut blocks = self.blocks.clone();
        blocks[index] = updated_block;

        self.store.save_reservations(&reservations)?;
        if let Err(e) = self.store.save_blocks(&blocks) {
            tracing::warn!(
                "Saving block {} failed, restoring previous reservations: {}",
                block_id,
                e
            );
            if let Err(restore_err) = self.store.save_reservations(&self.reservations) {
                tracing::error!("Could not restore reservations: {}", restore_err);
            }
            return Err(e);
        }

        self.reservations = reservations;
        self.blocks = blocks;
        self.next_reservation_id = following;

        tracing::info!(
            "Reservation {} created from block {}: room {} for {}",
            reservation.reservation_id(),
            block_id,
            room_id,
            reservation.stay()
        );
        Ok(reservation)
    }

    pub fn set_room_rate(&mut self, room_id: u32, room_rate: Decimal) -> Result<Room> {
        validate_id(room_id)?;
        validate_room_rate(room_rate)?;

        let index = self
            .rooms
            .iter()
            .position(|room| room.room_id == room_id)
            .ok_or_else(|| HotelError::not_found("Room", room_id))?;

        let mut rooms = self.rooms.clone();
        rooms[index].change_rate(room_rate);
        self.store.save_rates(&rooms)?;

        self.rooms = rooms;
        tracing::info!("Room {} rate set to {}", room_id, room_rate);
        Ok(self.rooms[index].clone())
    }
}

/// Id handed out after `id`. `u32::MAX` is never handed out, so a full id space fails here.
fn following_id(kind: &str, id: u32) -> Result<u32> {
    id.checked_add(1).ok_or_else(|| HotelError::StorageError {
        message: format!("{} ids are exhausted after {}", kind, id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::model::catalog;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn manager() -> ReservationManager<MemoryStore> {
        ReservationManager::new(MemoryStore::new(catalog(5, Decimal::new(100, 0)))).unwrap()
    }

    fn room_ids(rooms: &[Room]) -> Vec<u32> {
        rooms.iter().map(|room| room.room_id).collect()
    }

    #[test]
    fn test_all_rooms_available_when_empty() {
        let manager = manager();
        let rooms = manager
            .find_available_rooms(date("2024-03-01"), date("2024-03-03"))
            .unwrap();
        assert_eq!(room_ids(&rooms), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_find_available_rooms_rejects_bad_range() {
        let manager = manager();
        assert!(matches!(
            manager.find_available_rooms(date("2024-03-03"), date("2024-03-03")),
            Err(HotelError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_reserve_and_cost() {
        let mut manager = manager();
        let reservation = manager
            .reserve(1, date("2024-03-01"), date("2024-03-03"))
            .unwrap();

        assert_eq!(reservation.reservation_id(), 1);
        assert_eq!(manager.total_cost(1).unwrap(), Decimal::new(200, 0));
        assert_eq!(manager.store().saved_reservations().len(), 1);
    }

    #[test]
    fn test_reserved_room_only_blocked_for_overlapping_dates() {
        let mut manager = manager();
        manager
            .reserve(1, date("2024-03-01"), date("2024-03-03"))
            .unwrap();

        let overlapping = manager
            .find_available_rooms(date("2024-03-02"), date("2024-03-04"))
            .unwrap();
        assert_eq!(room_ids(&overlapping), vec![2, 3, 4, 5]);

        let after = manager
            .find_available_rooms(date("2024-03-03"), date("2024-03-05"))
            .unwrap();
        assert_eq!(room_ids(&after), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_reserve_rejects_double_booking() {
        let mut manager = manager();
        manager
            .reserve(1, date("2024-03-01"), date("2024-03-03"))
            .unwrap();

        let err = manager
            .reserve(1, date("2024-03-02"), date("2024-03-06"))
            .unwrap_err();
        assert!(matches!(err, HotelError::RoomUnavailable { room_id: 1, .. }));
        assert_eq!(manager.reservations().len(), 1);
    }

    #[test]
    fn test_reserve_validates_room() {
        let mut manager = manager();
        assert!(matches!(
            manager.reserve(0, date("2024-03-01"), date("2024-03-03")),
            Err(HotelError::InvalidId { .. })
        ));
        assert!(matches!(
            manager.reserve(42, date("2024-03-01"), date("2024-03-03")),
            Err(HotelError::InvalidRoom { room_id: 42, .. })
        ));
    }

    #[test]
    fn test_total_cost_unknown_reservation() {
        let manager = manager();
        assert!(matches!(
            manager.total_cost(9),
            Err(HotelError::NotFound {
                resource: "Reservation",
                id: 9
            })
        ));
    }

    #[test]
    fn test_block_hides_rooms_from_direct_booking() {
        let mut manager = manager();
        manager
            .create_block(
                &[2, 3],
                date("2024-03-01"),
                date("2024-03-05"),
                Decimal::new(1, 1),
            )
            .unwrap();

        let rooms = manager
            .find_available_rooms(date("2024-03-04"), date("2024-03-06"))
            .unwrap();
        assert_eq!(room_ids(&rooms), vec![1, 4, 5]);

        assert!(matches!(
            manager.reserve(2, date("2024-03-02"), date("2024-03-03")),
            Err(HotelError::RoomUnavailable { room_id: 2, .. })
        ));
    }

    #[test]
    fn test_create_block_names_first_unavailable_room() {
        let mut manager = manager();
        manager
            .reserve(4, date("2024-03-01"), date("2024-03-03"))
            .unwrap();

        let err = manager
            .create_block(
                &[1, 4, 5],
                date("2024-03-02"),
                date("2024-03-04"),
                Decimal::ZERO,
            )
            .unwrap_err();
        assert!(matches!(err, HotelError::RoomUnavailable { room_id: 4, .. }));
        assert!(manager.blocks().is_empty());
    }

    #[test]
    fn test_create_block_rejects_zero_and_unknown_rooms() {
        let mut manager = manager();

        assert!(matches!(
            manager.create_block(&[2, 0], date("2024-03-01"), date("2024-03-05"), Decimal::ZERO),
            Err(HotelError::InvalidId { .. })
        ));
        assert!(matches!(
            manager.create_block(&[2, 42], date("2024-03-01"), date("2024-03-05"), Decimal::ZERO),
            Err(HotelError::InvalidRoom { room_id: 42, .. })
        ));
        assert!(manager.blocks().is_empty());
        assert!(manager.store().saved_blocks().is_empty());

        // neither failure consumed a block id
        let block = manager
            .create_block(&[2], date("2024-03-01"), date("2024-03-05"), Decimal::ZERO)
            .unwrap();
        assert_eq!(block.block_id(), 1);
    }

    #[test]
    fn test_reserve_from_block() {
        let mut manager = manager();
        manager
            .create_block(
                &[2, 3],
                date("2024-03-01"),
                date("2024-03-05"),
                Decimal::new(1, 1),
            )
            .unwrap();

        let reservation = manager.reserve_from_block(2, 1).unwrap();
        assert_eq!(reservation.block_id(), Some(1));
        assert_eq!(reservation.total_cost().unwrap(), Decimal::new(360, 0));

        let remaining = manager.check_available_rooms_in_blocks(1).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].room_id, 3);

        assert!(matches!(
            manager.reserve_from_block(2, 1),
            Err(HotelError::RoomUnavailable { room_id: 2, .. })
        ));
    }

    #[test]
    fn test_reserve_from_block_checks_block_and_membership() {
        let mut manager = manager();
        manager
            .create_block(&[2, 3], date("2024-03-01"), date("2024-03-05"), Decimal::ZERO)
            .unwrap();

        assert!(matches!(
            manager.reserve_from_block(2, 8),
            Err(HotelError::NotFound {
                resource: "Block",
                id: 8
            })
        ));
        assert!(matches!(
            manager.reserve_from_block(4, 1),
            Err(HotelError::InvalidRoom { room_id: 4, .. })
        ));
        assert!(matches!(
            manager.reserve_from_block(0, 1),
            Err(HotelError::InvalidId { .. })
        ));
        assert!(matches!(
            manager.reserve_from_block(2, 0),
            Err(HotelError::InvalidId { .. })
        ));
        assert!(manager.reservations().is_empty());
        assert_eq!(manager.check_available_rooms_in_blocks(1).unwrap().len(), 2);
    }

    #[test]
    fn test_set_room_rate_keeps_existing_prices() {
        let mut manager = manager();
        manager
            .reserve(1, date("2024-03-01"), date("2024-03-03"))
            .unwrap();

        let room = manager.set_room_rate(1, Decimal::new(150, 0)).unwrap();
        assert_eq!(room.cost(), Decimal::new(150, 0));
        assert_eq!(manager.total_cost(1).unwrap(), Decimal::new(200, 0));

        let second = manager
            .reserve(1, date("2024-03-10"), date("2024-03-12"))
            .unwrap();
        assert_eq!(second.total_cost().unwrap(), Decimal::new(300, 0));
        assert_eq!(
            manager.store().saved_rooms()[0].cost(),
            Decimal::new(150, 0)
        );
    }

    #[test]
    fn test_total_cost_overflow_is_reported() {
        let mut manager = manager();
        manager.set_room_rate(1, Decimal::MAX).unwrap();
        manager
            .reserve(1, date("2024-01-01"), date("2024-01-03"))
            .unwrap();

        assert!(matches!(
            manager.total_cost(1),
            Err(HotelError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_set_room_rate_errors() {
        let mut manager = manager();
        assert!(matches!(
            manager.set_room_rate(6, Decimal::new(150, 0)),
            Err(HotelError::NotFound { resource: "Room", id: 6 })
        ));
        assert!(matches!(
            manager.set_room_rate(1, Decimal::ZERO),
            Err(HotelError::InvalidRate { .. })
        ));
    }
}
