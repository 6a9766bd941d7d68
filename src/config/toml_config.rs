use crate::domain::model::{catalog, Room};
use crate::utils::error::{HotelError, Result};
use crate::utils::validation::{validate_one_of, validate_path, validate_positive_number, Validate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotelConfig {
    #[serde(default)]
    pub hotel: HotelInfo,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelInfo {
    pub name: String,
}

impl Default for HotelInfo {
    fn default() -> Self {
        Self {
            name: "Hotel".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub room_count: u32,
    pub default_rate: Decimal,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            room_count: 20,
            default_rate: Decimal::new(200, 0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub rooms_file: Option<String>,
    pub reservations_file: Option<String>,
    pub blocks_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./support".to_string(),
            rooms_file: None,
            reservations_file: None,
            blocks_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl HotelConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HotelError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HotelError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOTEL_DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HotelError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("catalog.room_count", self.catalog.room_count as usize, 1)?;

        if self.catalog.default_rate <= Decimal::ZERO {
            return Err(HotelError::InvalidConfigValueError {
                field: "catalog.default_rate".to_string(),
                value: self.catalog.default_rate.to_string(),
                reason: "Nightly rate must be positive".to_string(),
            });
        }

        validate_path("storage.data_dir", &self.storage.data_dir)?;
        for (field, file) in [
            ("storage.rooms_file", &self.storage.rooms_file),
            ("storage.reservations_file", &self.storage.reservations_file),
            ("storage.blocks_file", &self.storage.blocks_file),
        ] {
            if let Some(file) = file {
                validate_path(field, file)?;
            }
        }

        validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;

        Ok(())
    }

    /// 預設房間目錄：1..=room_count，皆為 default_rate
    pub fn room_catalog(&self) -> Vec<Room> {
        catalog(self.catalog.room_count, self.catalog.default_rate)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format == "json"
    }
}

impl Validate for HotelConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = HotelConfig::default();
        assert_eq!(config.catalog.room_count, 20);
        assert_eq!(config.catalog.default_rate, Decimal::new(200, 0));
        assert_eq!(config.storage.data_dir, "./support");
        assert!(config.validate().is_ok());

        let rooms = config.room_catalog();
        assert_eq!(rooms.len(), 20);
        assert_eq!(rooms[19].room_id, 20);
    }

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[hotel]
name = "Ada's Inn"

[catalog]
room_count = 8
default_rate = "150.50"

[storage]
data_dir = "./data"
reservations_file = "bookings.csv"

[logging]
level = "debug"
format = "json"
"#;

        let config = HotelConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.hotel.name, "Ada's Inn");
        assert_eq!(config.catalog.room_count, 8);
        assert_eq!(config.catalog.default_rate, Decimal::new(15050, 2));
        assert_eq!(config.storage.reservations_file.as_deref(), Some("bookings.csv"));
        assert!(config.storage.blocks_file.is_none());
        assert!(config.json_logging());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = HotelConfig::from_toml_str("[hotel]\nname = \"Tiny\"\n").unwrap();
        assert_eq!(config.catalog.room_count, 20);
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_HOTEL_DATA_DIR", "/var/lib/hotel");

        let toml_content = r#"
[storage]
data_dir = "${TEST_HOTEL_DATA_DIR}"
"#;

        let config = HotelConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/hotel");

        std::env::remove_var("TEST_HOTEL_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = HotelConfig::from_toml_str(
            r#"
[catalog]
room_count = 0
default_rate = "200"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = HotelConfig::from_toml_str(
            r#"
[logging]
level = "info"
format = "xml"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(HotelError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        assert!(matches!(
            HotelConfig::from_toml_str("[catalog\nroom_count = 3"),
            Err(HotelError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[hotel]
name = "file-test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = HotelConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.hotel.name, "file-test");
    }
}
