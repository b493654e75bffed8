pub mod bin_key;
pub mod record;

// re-export for cleaner imports
pub use self::bin_key::BinKey;
pub use self::record::{Record, call_set_name};
