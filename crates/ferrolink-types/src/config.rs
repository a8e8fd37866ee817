//! Configuration value types for FerroLink
//!
//! Validated newtypes shared by the configuration crate and the sync engine.

/// Worker count for parallel link execution, with validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize", into = "usize"))]
pub struct ThreadCount(usize);

impl ThreadCount {
    /// Minimum thread count
    pub const MIN: usize = 1;
    /// Maximum thread count
    pub const MAX: usize = 256;

    /// Create a new thread count with validation
    pub fn new(count: usize) -> Result<Self, String> {
        if count < Self::MIN {
            Err(format!("Thread count {} is below minimum {}", count, Self::MIN))
        } else if count > Self::MAX {
            Err(format!("Thread count {} exceeds maximum {}", count, Self::MAX))
        } else {
            Ok(Self(count))
        }
    }

    /// A single worker: links are created on the calling thread
    pub const fn single() -> Self {
        Self(1)
    }

    /// Get the thread count value
    pub fn get(self) -> usize {
        self.0
    }

    /// Whether more than one worker is requested
    pub fn is_parallel(self) -> bool {
        self.0 > 1
    }
}

impl Default for ThreadCount {
    fn default() -> Self {
        Self::single()
    }
}

impl TryFrom<usize> for ThreadCount {
    type Error = String;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<ThreadCount> for usize {
    fn from(count: ThreadCount) -> Self {
        count.0
    }
}
