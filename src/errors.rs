use thiserror::Error;

#[derive(Error, Debug)]
pub enum LandscapeError {
    // Construction-time errors
    #[error("Invalid generation config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Landscape dimensions must be positive, got {size_x}x{size_y}")]
    InvalidDimensions { size_x: i32, size_y: i32 },

    // Query-time errors
    #[error("Position ({x},{y}) out of range for {max_x}x{max_y} grid")]
    PositionOutOfRange {
        x: i32,
        y: i32,
        max_x: i32,
        max_y: i32,
    },
}

/// Result type alias for all operations
pub type LandscapeResult<T> = Result<T, LandscapeError>;
