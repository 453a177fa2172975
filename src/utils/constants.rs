/// Source files shipped with the station-network export
pub const DEFAULT_SOURCE_FILES: [&str; 3] = ["Aemet20171029", "Aemet20171030", "Aemet20171031"];

/// File names and extensions
pub const SOURCE_EXTENSION: &str = "csv";
pub const DEFAULT_NORMALIZED_SUFFIX: &str = "_utf8";
pub const DEFAULT_CONFIG_FILE: &str = "aemet.toml";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Legacy charset of the raw exports
pub const DEFAULT_SOURCE_ENCODING: &str = "windows-1252";

/// Row layout
pub const FIELD_DELIMITER: u8 = b';';
pub const MIN_FIELDS: usize = 7;
pub const COL_LOCALITY: usize = 0;
pub const COL_PROVINCE: usize = 1;
pub const COL_MAX_TEMP: usize = 2;
pub const COL_MAX_TEMP_TIME: usize = 3;
pub const COL_MIN_TEMP: usize = 4;
pub const COL_MIN_TEMP_TIME: usize = 5;
pub const COL_PRECIPITATION: usize = 6;

/// File name layout: `Aemet` + `yyyyMMdd`
pub const DEFAULT_STATION_PREFIX_LEN: usize = 5;
pub const FILE_DATE_LEN: usize = 8;
pub const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// Time-of-day layout in the raw rows
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";
pub const TIME_OF_DAY_LEN: usize = 5;
pub const SHORT_TIME_OF_DAY_LEN: usize = 4;

/// Persistence defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://aemet.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
