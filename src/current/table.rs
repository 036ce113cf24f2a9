//! Ordered table of achievable current limits.

use core::ops::RangeInclusive;

use heapless::Vec;

use super::ladder::ResistorLadder;
use super::linear::LinearCodes;
use crate::error::TableError;

/// Maximum number of codes in a current-limit table.
pub const MAX_CODES: usize = 128;

/// Achievable current limits in milliamps, indexed by code.
///
/// Values are non-decreasing in code. The table is never empty once built, so
/// [`min_value`](Self::min_value) and [`max_value`](Self::max_value) always refer to
/// real entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentLimitTable {
    values: Vec<u32, MAX_CODES>,
}

impl CurrentLimitTable {
    /// Build a table from explicit values, one per code.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` is empty, too long, or decreases anywhere.
    pub fn from_values(values: &[u32]) -> Result<Self, TableError> {
        if values.is_empty() {
            return Err(TableError::Empty);
        }
        let values =
            Vec::from_slice(values).map_err(|_| TableError::TooManyCodes(values.len()))?;
        check_monotonic(&values)?;
        Ok(Self { values })
    }

    /// Build a table from evenly spaced firmware codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the code count exceeds [`MAX_CODES`].
    pub fn from_linear(codes: &LinearCodes) -> Result<Self, TableError> {
        let count = codes.code_count();
        if count == 0 {
            return Err(TableError::Empty);
        }
        if count > MAX_CODES {
            return Err(TableError::TooManyCodes(count));
        }

        let mut values = Vec::new();
        for code in 0..count {
            // Capacity checked above.
            let _ = values.push(codes.current_ma(code as u32));
        }
        check_monotonic(&values)?;
        Ok(Self { values })
    }

    /// Build a table from a resistor-ladder model.
    ///
    /// Index 0 holds the lowest current, which the ladder produces at its highest DAC
    /// level.
    ///
    /// # Errors
    ///
    /// Returns an error if any code yields a non-finite or negative current, or if
    /// the resulting sequence is not non-decreasing.
    pub fn from_ladder(ladder: &ResistorLadder) -> Result<Self, TableError> {
        let count = ladder.codes as usize;
        if count == 0 {
            return Err(TableError::Empty);
        }
        if count > MAX_CODES {
            return Err(TableError::TooManyCodes(count));
        }

        let mut values = Vec::new();
        for code in 0..count {
            let dac_level = (count - 1 - code) as u32;
            let ma = ladder.current_ma(dac_level);
            if !ma.is_finite() {
                return Err(TableError::NotFinite { code });
            }
            let rounded = libm::round(ma);
            if rounded < 0.0 {
                return Err(TableError::Negative { code });
            }
            let _ = values.push(rounded as u32);
        }
        check_monotonic(&values)?;
        Ok(Self { values })
    }

    /// Keep only the codes in `codes`, renumbering them from zero.
    ///
    /// # Errors
    ///
    /// Returns `TableError::EmptySelection` if the range selects no existing code.
    pub fn restrict(self, codes: RangeInclusive<usize>) -> Result<Self, TableError> {
        let start = *codes.start();
        let end = (*codes.end()).min(self.values.len().saturating_sub(1));
        if start > end || start >= self.values.len() {
            return Err(TableError::EmptySelection);
        }
        let values =
            Vec::from_slice(&self.values[start..=end]).map_err(|_| TableError::EmptySelection)?;
        Ok(Self { values })
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current at `code`, if the code exists.
    pub fn value(&self, code: usize) -> Option<u32> {
        self.values.get(code).copied()
    }

    /// All values in code order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Lowest achievable current.
    pub fn min_value(&self) -> u32 {
        self.values.first().copied().unwrap_or(0)
    }

    /// Highest achievable current.
    pub fn max_value(&self) -> u32 {
        self.values.last().copied().unwrap_or(0)
    }

    /// Whether `ma` is exactly one of the table's values.
    pub fn contains(&self, ma: u32) -> bool {
        self.values.binary_search(&ma).is_ok()
    }

    /// Highest code whose current does not exceed `target_ma`, or code 0 when the
    /// target is below every entry.
    pub fn code_at_or_below(&self, target_ma: u32) -> usize {
        self.values
            .partition_point(|&v| v <= target_ma)
            .saturating_sub(1)
    }

    /// Largest achievable current that does not exceed `target_ma`, or the table's
    /// minimum when the target is below it.
    pub fn nearest_at_or_below(&self, target_ma: u32) -> u32 {
        self.value(self.code_at_or_below(target_ma))
            .unwrap_or_else(|| self.min_value())
    }
}

fn check_monotonic(values: &[u32]) -> Result<(), TableError> {
    for (code, pair) in values.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(TableError::NotMonotonic {
                code: code + 1,
                previous: pair[0],
                value: pair[1],
            });
        }
    }
    Ok(())
}
