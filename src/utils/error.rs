use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HotelError {
    #[error("Invalid id {id}: ids must be positive integers")]
    InvalidId { id: String },

    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("Invalid date range: check-in {check_in} must be before check-out {check_out}")]
    InvalidRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Invalid room {room_id}: {reason}")]
    InvalidRoom { room_id: u32, reason: String },

    #[error("Room {room_id} is not available from {check_in} to {check_out}")]
    RoomUnavailable {
        room_id: u32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("A block holds at most {max} rooms, {requested} were requested")]
    TooManyRooms { requested: usize, max: usize },

    #[error("A block must hold at least one room")]
    EmptyBlock,

    #[error("Invalid rate {value}: {reason}")]
    InvalidRate { value: Decimal, reason: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: u32 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端輸入有誤
    Validation,
    /// 房間或區塊狀態不允許此操作
    Conflict,
    NotFound,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HotelError {
    pub fn not_found(resource: &'static str, id: u32) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidId { .. }
            | Self::InvalidDate { .. }
            | Self::InvalidRange { .. }
            | Self::InvalidRoom { .. }
            | Self::TooManyRooms { .. }
            | Self::EmptyBlock
            | Self::InvalidRate { .. } => ErrorCategory::Validation,
            Self::RoomUnavailable { .. } => ErrorCategory::Conflict,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::StorageError { .. } => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Medium,
            ErrorCategory::Conflict => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidId { .. } => "Use a positive whole number for room, block and reservation ids",
            Self::InvalidDate { .. } => "Write dates as YYYY-MM-DD",
            Self::InvalidRange { .. } => "Choose a check-out date after the check-in date",
            Self::InvalidRoom { .. } => "Check the room number against the hotel catalog or the block's rooms",
            Self::RoomUnavailable { .. } => "Search available rooms for the dates and pick another room",
            Self::TooManyRooms { .. } => "Split the group into several blocks of at most five rooms",
            Self::EmptyBlock => "List at least one room for the block",
            Self::InvalidRate { .. } => "Use a positive nightly rate and a discount between 0 and 1",
            Self::NotFound { .. } => "List existing reservations or blocks to find a valid id",
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Inspect the data files for hand edits or corruption"
            }
            Self::IoError(_) | Self::StorageError { .. } => {
                "Check that the data directory exists and is writable"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Fix the configuration file and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Storage => format!("Could not read or write hotel data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HotelError>;
