pub mod formula;

pub mod metadata_mapper;
pub use metadata_mapper::MetadataMapper;

pub mod synchronizer;
pub use synchronizer::{RowSynchronizer, Transition};
