//! Storage layer (JSON files on local disk).

pub mod json_file;

pub use json_file::{read_json, write_json, StoreError};

/// Well-known file and directory names under the data directory.
pub mod paths {
    pub const USERS_FILE: &str = "users.json";
    pub const HISTORY_DIR: &str = "history";
}
