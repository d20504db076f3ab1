/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while validating or manipulating the world model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two map locations in one realm share a coordinate.
    #[error("duplicate location at ({x}, {y}) in realm \"{realm}\"")]
    DuplicateCoordinate {
        /// The realm name.
        realm: String,
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// A location lies outside the realm's declared bounds.
    #[error("location ({x}, {y}) lies outside the {width}x{height} realm")]
    OutOfBounds {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// Realm width.
        width: u32,
        /// Realm height.
        height: u32,
    },

    /// A reference to another aggregate could not be resolved.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// A generic validation error with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}
