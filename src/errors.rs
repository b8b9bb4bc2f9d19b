use std::fmt::Display;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SGError
{
    IndexTableSizeMismatch,
    SurplusSizeMismatch,
    NodeIndexOverflow,
    LevelOutOfRange,
    InvalidCompactLayout,
    CompactGridMismatch,
    InvalidDofRange,
    OutputBufferTooSmall,
    StateCountMismatch,
    StateDimensionMismatch,
    InvalidStateIndex,
    LZ4DecompressionFailed,
    ReadBufferFailed,
    WriteBufferFailed,
    SerializationFailed,
    DeserializationFailed,
    FileIOError,
}
impl std::error::Error for SGError {}

impl Display for SGError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", *self)
    }
}
