use crate::model::BlockId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The graph references a block id that is not present in the input map.
    #[error("graph references unknown block {target:#x}")]
    InvalidGraph { target: BlockId },

    /// A spacing value in the configuration is zero or negative.
    #[error("layout config field `{field}` must be positive, got {value}")]
    ConfigOutOfRange { field: &'static str, value: i32 },

    /// A sanity check inside the engine failed. This is a bug in the layout
    /// engine, not in the caller's input.
    #[error("internal layout invariant violated: {message}")]
    InternalInvariant { message: &'static str },
}
