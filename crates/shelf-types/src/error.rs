use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("sample id {value} out of range [0, {limit})")]
    SampleIdOutOfRange { value: u64, limit: u32 },

    #[error("invalid shard segment: {0}")]
    InvalidSegment(String),

    #[error("invalid UTC offset: {hours} hours")]
    InvalidOffset { hours: i32 },
}
