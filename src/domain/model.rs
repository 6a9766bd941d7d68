use crate::domain::date_range::{DateRange, DateRanged};
use crate::utils::error::{HotelError, Result};
use crate::utils::validation::{validate_discount_rate, validate_id};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_BLOCK_ROOMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: u32,
    rate: Decimal,
}

impl Room {
    pub fn new(room_id: u32, rate: Decimal) -> Self {
        Self { room_id, rate }
    }

    /// Current nightly rate.
    pub fn cost(&self) -> Decimal {
        self.rate
    }

    /// Callers are expected to have checked that `new_rate` is positive.
    pub fn change_rate(&mut self, new_rate: Decimal) {
        self.rate = new_rate;
    }
}

/// Rooms `1..=room_count`, all at `rate`.
pub fn catalog(room_count: u32, rate: Decimal) -> Vec<Room> {
    (1..=room_count).map(|room_id| Room::new(room_id, rate)).collect()
}

/// One room booked for a stay. The nightly rate and discount are captured when
/// the reservation is made, so later rate changes do not reprice it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    reservation_id: u32,
    room_id: u32,
    stay: DateRange,
    nightly_rate: Decimal,
    discount_rate: Decimal,
    block_id: Option<u32>,
}

impl Reservation {
    pub fn new(reservation_id: u32, room_id: u32, stay: DateRange, nightly_rate: Decimal) -> Self {
        Self {
            reservation_id,
            room_id,
            stay,
            nightly_rate,
            discount_rate: Decimal::ZERO,
            block_id: None,
        }
    }

    /// Marks the reservation as claimed from `block_id` at the block's discount.
    pub fn from_block(mut self, block_id: u32, discount_rate: Decimal) -> Self {
        self.block_id = Some(block_id);
        self.discount_rate = discount_rate;
        self
    }

    pub fn reservation_id(&self) -> u32 {
        self.reservation_id
    }

    pub fn room_id(&self) -> u32 {
        self.room_id
    }

    pub fn stay(&self) -> DateRange {
        self.stay
    }

    pub fn nightly_rate(&self) -> Decimal {
        self.nightly_rate
    }

    pub fn discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    pub fn block_id(&self) -> Option<u32> {
        self.block_id
    }

    pub fn nights(&self) -> i64 {
        self.stay.nights()
    }

    /// `nights × nightly_rate × (1 − discount_rate)`, rounded to cents.
    pub fn total_cost(&self) -> Result<Decimal> {
        (Decimal::ONE - self.discount_rate)
            .checked_mul(self.nightly_rate)
            .and_then(|effective_rate| effective_rate.checked_mul(Decimal::from(self.nights())))
            .map(|cost| cost.round_dp(2))
            .ok_or_else(|| HotelError::InvalidRate {
                value: self.nightly_rate,
                reason: format!("cost of {} nights does not fit in a decimal", self.nights()),
            })
    }
}

impl DateRanged for Reservation {
    fn check_in(&self) -> NaiveDate {
        self.stay.start()
    }

    fn check_out(&self) -> NaiveDate {
        self.stay.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRoom {
    pub room_id: u32,
    pub status: RoomStatus,
}

/// Up to five rooms held together for one stay at a discount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    block_id: u32,
    rooms_info: Vec<BlockRoom>,
    stay: DateRange,
    discount_rate: Decimal,
}

impl Block {
    pub fn new(
        block_id: u32,
        room_ids: &[u32],
        stay: DateRange,
        discount_rate: Decimal,
    ) -> Result<Self> {
        let rooms_info = room_ids
            .iter()
            .map(|&room_id| BlockRoom {
                room_id,
                status: RoomStatus::Available,
            })
            .collect();
        Self::restore(block_id, rooms_info, stay, discount_rate)
    }

    /// Rebuilds a block with per-room status, e.g. after loading it from a store.
    pub fn restore(
        block_id: u32,
        rooms_info: Vec<BlockRoom>,
        stay: DateRange,
        discount_rate: Decimal,
    ) -> Result<Self> {
        validate_id(block_id)?;
        if rooms_info.is_empty() {
            return Err(HotelError::EmptyBlock);
        }
        if rooms_info.len() > MAX_BLOCK_ROOMS {
            return Err(HotelError::TooManyRooms {
                requested: rooms_info.len(),
                max: MAX_BLOCK_ROOMS,
            });
        }

        let mut seen = HashSet::new();
        for room in &rooms_info {
            validate_id(room.room_id)?;
            if !seen.insert(room.room_id) {
                return Err(HotelError::InvalidRoom {
                    room_id: room.room_id,
                    reason: "listed more than once in the block".to_string(),
                });
            }
        }
        validate_discount_rate(discount_rate)?;

        Ok(Self {
            block_id,
            rooms_info,
            stay,
            discount_rate,
        })
    }

    pub fn block_id(&self) -> u32 {
        self.block_id
    }

    pub fn stay(&self) -> DateRange {
        self.stay
    }

    pub fn discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    pub fn rooms_info(&self) -> &[BlockRoom] {
        &self.rooms_info
    }

    pub fn room_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.rooms_info.iter().map(|room| room.room_id)
    }

    pub fn status_of(&self, room_id: u32) -> Option<RoomStatus> {
        self.rooms_info
            .iter()
            .find(|room| room.room_id == room_id)
            .map(|room| room.status)
    }

    /// Rooms of this block nobody has claimed yet, in block order.
    pub fn check_available_rooms(&self) -> Vec<BlockRoom> {
        self.rooms_info
            .iter()
            .filter(|room| room.status == RoomStatus::Available)
            .copied()
            .collect()
    }

    /// Flips `room_id` to unavailable. Rooms outside the block are ignored;
    /// returns whether a room actually changed state.
    pub fn reserve_room(&mut self, room_id: u32) -> bool {
        match self
            .rooms_info
            .iter_mut()
            .find(|room| room.room_id == room_id)
        {
            Some(room) if room.status == RoomStatus::Available => {
                room.status = RoomStatus::Unavailable;
                true
            }
            _ => false,
        }
    }
}

impl DateRanged for Block {
    fn check_in(&self) -> NaiveDate {
        self.stay.start()
    }

    fn check_out(&self) -> NaiveDate {
        self.stay.end()
    }
}
