pub mod map;
pub mod reduce;
