pub mod json_writer;
pub mod report_formatter;

pub use json_writer::JsonStore;
pub use report_formatter::ReportFormatter;
