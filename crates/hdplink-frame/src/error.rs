/// Errors from frame field access and measurement decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A fixed-offset field lies beyond the end of the frame.
    #[error("field at offset {offset} out of bounds for {len}-byte frame")]
    FieldOutOfBounds { offset: usize, len: usize },

    /// The frame is shorter than the smallest layout carrying its opcode.
    #[error("frame truncated ({len} bytes, need at least {need})")]
    Truncated { need: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
