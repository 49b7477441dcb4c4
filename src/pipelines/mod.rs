pub(crate) mod cache;
pub mod detection;
pub(crate) mod stats;
pub(crate) mod utils;
