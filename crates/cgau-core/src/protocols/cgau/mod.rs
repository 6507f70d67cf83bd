//! CGAU environmental-sensor frame decoding.
//!
//! A frame starts with the ASCII magic `CGAU`. Temperature, humidity and CO2
//! follow as three little-endian `u16` words at a fixed offset (13). No
//! checksum, length or version field is validated beyond the magic.
//!
//! ```text
//! 0      4                13     15     17     19
//! +------+-----------------+------+------+------+------
//! | CGAU | (unparsed)      | temp | hum  | co2  | ...
//! +------+-----------------+------+------+------+------
//! ```
//!
//! Wire offsets live in `layout`, bounds-checked reads in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{SensorReading, extract_reading, parse_frame, validate_header};
