pub mod charset_normalizer;
pub mod record_parser;

pub use charset_normalizer::CharsetNormalizer;
pub use record_parser::{
    parse_day_from_file_name, parse_day_with_prefix, parse_time_of_day, ParseStats, RecordParser,
    RowOutcome,
};
