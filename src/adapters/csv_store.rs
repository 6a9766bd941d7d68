use crate::config::HotelConfig;
use crate::domain::date_range::DateRange;
use crate::domain::model::{Block, BlockRoom, Reservation, Room};
use crate::domain::ports::{BlockStore, ReservationStore, RoomCatalogStore};
use crate::utils::error::{HotelError, Result};
use crate::utils::validation::validate_id;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ROOM_HEADERS: [&str; 2] = ["room_id", "cost"];
const RESERVATION_HEADERS: [&str; 7] = [
    "reservation_id",
    "room_id",
    "check_in_date",
    "check_out_date",
    "nightly_rate",
    "discount_rate",
    "block_id",
];
const BLOCK_HEADERS: [&str; 5] = [
    "block_id",
    "rooms_info",
    "check_in_date",
    "check_out_date",
    "discount_rate",
];

#[derive(Debug, Serialize, Deserialize)]
struct RoomRow {
    room_id: u32,
    cost: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReservationRow {
    reservation_id: u32,
    room_id: u32,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    nightly_rate: String,
    discount_rate: String,
    block_id: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlockRow {
    block_id: u32,
    rooms_info: String,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    discount_rate: String,
}

/// Stores rooms, reservations and blocks as CSV files under one directory.
/// Every save rewrites the whole file.
#[derive(Debug, Clone)]
pub struct CsvStore {
    base_path: PathBuf,
    rooms_file: String,
    reservations_file: String,
    blocks_file: String,
    default_catalog: Vec<Room>,
}

impl CsvStore {
    /// `default_catalog` is used when no rooms file exists yet.
    pub fn new(base_path: impl Into<PathBuf>, default_catalog: Vec<Room>) -> Self {
        Self {
            base_path: base_path.into(),
            rooms_file: "rooms.csv".to_string(),
            reservations_file: "reservations.csv".to_string(),
            blocks_file: "blocks.csv".to_string(),
            default_catalog,
        }
    }

    pub fn from_config(config: &HotelConfig) -> Self {
        let storage = &config.storage;
        let mut store = Self::new(&storage.data_dir, config.room_catalog());
        if let Some(file) = &storage.rooms_file {
            store.rooms_file = file.clone();
        }
        if let Some(file) = &storage.reservations_file {
            store.reservations_file = file.clone();
        }
        if let Some(file) = &storage.blocks_file {
            store.blocks_file = file.clone();
        }
        store
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn full_path(&self, file: &str) -> PathBuf {
        self.base_path.join(file)
    }

    /// `None` when the file does not exist yet.
    fn read_rows<T: DeserializeOwned>(&self, file: &str) -> Result<Option<Vec<T>>> {
        let full_path = self.full_path(file);
        let data = match fs::read(&full_path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} not found, starting empty", full_path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(data.as_slice());
        let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
        tracing::debug!("Read {} rows from {}", rows.len(), full_path.display());
        Ok(Some(rows))
    }

    fn write_rows<T: Serialize>(&self, file: &str, headers: &[&str], rows: &[T]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(headers)?;
        for row in rows {
            writer.serialize(row)?;
        }
        let data = writer.into_inner().map_err(|e| HotelError::StorageError {
            message: e.to_string(),
        })?;

        let full_path = self.full_path(file);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, data)?;

        tracing::debug!("Wrote {} rows to {}", rows.len(), full_path.display());
        Ok(())
    }
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim()).map_err(|e| HotelError::StorageError {
        message: format!("{} '{}' is not a decimal: {}", field, value, e),
    })
}

impl RoomCatalogStore for CsvStore {
    fn load_rooms(&self) -> Result<Vec<Room>> {
        let Some(rows) = self.read_rows::<RoomRow>(&self.rooms_file)? else {
            return Ok(self.default_catalog.clone());
        };

        let mut seen = HashSet::new();
        rows.into_iter()
            .map(|row| -> Result<Room> {
                validate_id(row.room_id)?;
                if !seen.insert(row.room_id) {
                    return Err(HotelError::InvalidRoom {
                        room_id: row.room_id,
                        reason: format!("listed more than once in {}", self.rooms_file),
                    });
                }
                Ok(Room::new(row.room_id, parse_decimal("cost", &row.cost)?))
            })
            .collect()
    }

    fn save_rates(&self, rooms: &[Room]) -> Result<()> {
        let rows: Vec<RoomRow> = rooms
            .iter()
            .map(|room| RoomRow {
                room_id: room.room_id,
                cost: room.cost().to_string(),
            })
            .collect();
        self.write_rows(&self.rooms_file, &ROOM_HEADERS, &rows)
    }
}

impl ReservationStore for CsvStore {
    fn load_reservations(&self) -> Result<Vec<Reservation>> {
        let rows = self
            .read_rows::<ReservationRow>(&self.reservations_file)?
            .unwrap_or_default();

        rows.into_iter()
            .map(|row| -> Result<Reservation> {
                let stay = DateRange::new(row.check_in_date, row.check_out_date)?;
                let reservation = Reservation::new(
                    row.reservation_id,
                    row.room_id,
                    stay,
                    parse_decimal("nightly_rate", &row.nightly_rate)?,
                );
                Ok(match row.block_id {
                    Some(block_id) => reservation
                        .from_block(block_id, parse_decimal("discount_rate", &row.discount_rate)?),
                    None => reservation,
                })
            })
            .collect()
    }

    fn save_reservations(&self, reservations: &[Reservation]) -> Result<()> {
        let rows: Vec<ReservationRow> = reservations
            .iter()
            .map(|reservation| ReservationRow {
                reservation_id: reservation.reservation_id(),
                room_id: reservation.room_id(),
                check_in_date: reservation.stay().start(),
                check_out_date: reservation.stay().end(),
                nightly_rate: reservation.nightly_rate().to_string(),
                discount_rate: reservation.discount_rate().to_string(),
                block_id: reservation.block_id(),
            })
            .collect();
        self.write_rows(&self.reservations_file, &RESERVATION_HEADERS, &rows)
    }
}

impl BlockStore for CsvStore {
    fn load_blocks(&self) -> Result<Vec<Block>> {
        let rows = self
            .read_rows::<BlockRow>(&self.blocks_file)?
            .unwrap_or_default();

        rows.into_iter()
            .map(|row| -> Result<Block> {
                let rooms_info: Vec<BlockRoom> = serde_json::from_str(&row.rooms_info)?;
                let stay = DateRange::new(row.check_in_date, row.check_out_date)?;
                Block::restore(
                    row.block_id,
                    rooms_info,
                    stay,
                    parse_decimal("discount_rate", &row.discount_rate)?,
                )
            })
            .collect()
    }

    fn save_blocks(&self, blocks: &[Block]) -> Result<()> {
        let rows = blocks
            .iter()
            .map(|block| {
                Ok(BlockRow {
                    block_id: block.block_id(),
                    rooms_info: serde_json::to_string(block.rooms_info())?,
                    check_in_date: block.stay().start(),
                    check_out_date: block.stay().end(),
                    discount_rate: block.discount_rate().to_string(),
                })
            })
            .collect::<Result<Vec<BlockRow>>>()?;
        self.write_rows(&self.blocks_file, &BLOCK_HEADERS, &rows)
    }
}
