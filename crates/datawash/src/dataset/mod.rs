//! Dataset and value types shared by every pipeline stage.

mod table;
mod value;

pub use table::{Dataset, Records, Row};
pub use value::{NOT_AVAILABLE, Value, format_number, parse_bool, parse_date, parse_number};
