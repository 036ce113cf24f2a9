//! Current-limit tables.
//!
//! A controller's driver cannot produce arbitrary coil currents. Each product family
//! has a fixed set of codes, and each code maps to one achievable current in
//! milliamps. This module derives those tables and quantizes requested values onto
//! them.

mod ladder;
mod linear;
mod table;

pub use ladder::ResistorLadder;
pub use linear::LinearCodes;
pub use table::{CurrentLimitTable, MAX_CODES};

use core::ops::RangeInclusive;

use crate::error::TableError;

/// Where a product's current-limit table comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentTableSource {
    /// Evenly spaced codes with firmware rounding.
    Linear(LinearCodes),
    /// Analog resistor-ladder model driven by a DAC code.
    Ladder(ResistorLadder),
    /// Measured values, one per code, ascending.
    Measured(&'static [u32]),
}

/// Static description of a product's current-limit table.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentTableSpec {
    /// Generator for the full code range.
    pub source: CurrentTableSource,
    /// Codes that may actually be selected.
    pub selectable: RangeInclusive<usize>,
}

impl CurrentTableSpec {
    /// Build the table this describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated values are not non-decreasing or the
    /// selectable range is empty.
    pub fn build(&self) -> Result<CurrentLimitTable, TableError> {
        let full = match &self.source {
            CurrentTableSource::Linear(codes) => CurrentLimitTable::from_linear(codes)?,
            CurrentTableSource::Ladder(ladder) => CurrentLimitTable::from_ladder(ladder)?,
            CurrentTableSource::Measured(values) => CurrentLimitTable::from_values(values)?,
        };
        full.restrict(self.selectable.clone())
    }
}
