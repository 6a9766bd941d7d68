use crate::utils::error::{HotelError, Result};
use rust_decimal::Decimal;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Shared id guard: room, block and reservation ids are positive integers.
pub fn validate_id(id: u32) -> Result<u32> {
    if id == 0 {
        return Err(HotelError::InvalidId { id: id.to_string() });
    }
    Ok(id)
}

/// 將文字輸入轉為 id，非整數或非正數皆視為無效
pub fn parse_id(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    let id = trimmed.parse::<u32>().map_err(|_| HotelError::InvalidId {
        id: trimmed.to_string(),
    })?;
    validate_id(id)
}

/// Block discounts live in `[0, 1)`.
pub fn validate_discount_rate(rate: Decimal) -> Result<Decimal> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(HotelError::InvalidRate {
            value: rate,
            reason: "discount must be at least 0 and below 1".to_string(),
        });
    }
    Ok(rate)
}

pub fn validate_room_rate(rate: Decimal) -> Result<Decimal> {
    if rate <= Decimal::ZERO {
        return Err(HotelError::InvalidRate {
            value: rate,
            reason: "nightly rate must be positive".to_string(),
        });
    }
    Ok(rate)
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HotelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HotelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(HotelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(HotelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Supported values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}
