//! Convert MySQL/MariaDB dumps into PostgreSQL scripts.
//!
//! ```no_run
//! use mysql2pg::convert::Converter;
//!
//! let dump = std::fs::read_to_string("dump.sql").unwrap();
//! let converted = Converter::default().convert(&dump);
//! std::fs::write("dump.pg.sql", converted.text).unwrap();
//! ```

pub mod convert;
pub mod parser;
pub mod source;
