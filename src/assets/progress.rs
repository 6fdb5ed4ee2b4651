//! Byte progress of a single asset, or weighted units of all assets combined.

/// Bytes received so far versus bytes expected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded_bytes: u64,
    pub total_bytes: u64,
}

impl LoadProgress {
    #[must_use]
    pub fn new(loaded_bytes: u64, total_bytes: u64) -> Self {
        Self {
            loaded_bytes,
            total_bytes,
        }
    }

    /// Whole percent, rounded down and clamped to `0..=100`.
    /// An unknown total reads as 0.
    #[must_use]
    pub fn percent(&self) -> u32 {
        self.scaled(100) as u32
    }

    /// Completed fraction expressed out of `scale`, rounded down.
    #[must_use]
    pub fn scaled(&self, scale: u64) -> u64 {
        if self.total_bytes == 0 {
            return 0;
        }
        let loaded = u128::from(self.loaded_bytes.min(self.total_bytes));
        (loaded * u128::from(scale) / u128::from(self.total_bytes)) as u64
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_bytes > 0 && self.loaded_bytes >= self.total_bytes
    }
}
