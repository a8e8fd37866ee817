//! Result type alias for FerroLink operations

use crate::Error;

/// Result type alias for FerroLink operations
pub type Result<T> = std::result::Result<T, Error>;
