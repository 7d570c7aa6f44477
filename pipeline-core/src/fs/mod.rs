pub mod persistence;

pub use persistence::{read_bytes, write_atomic};
