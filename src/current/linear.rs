//! Evenly spaced current-limit codes.

/// Current limits that are a fixed multiple of the code, subject to the firmware's
/// coarser resolution at high codes.
///
/// Codes above 32 only take effect in steps of two, and codes above 64 in steps of
/// four; an in-between code behaves like the code below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCodes {
    /// Milliamps per code.
    pub units_ma: u32,
    /// Highest code the firmware accepts.
    pub max_code: u8,
}

impl LinearCodes {
    /// Number of codes, including code 0.
    pub fn code_count(&self) -> usize {
        self.max_code as usize + 1
    }

    /// Code the firmware actually applies when given `code`.
    pub fn effective_code(&self, code: u32) -> u32 {
        let code = code.min(self.max_code as u32);
        if code > 64 {
            code & !3
        } else if code > 32 {
            code & !1
        } else {
            code
        }
    }

    /// Current in milliamps that `code` produces.
    pub fn current_ma(&self, code: u32) -> u32 {
        self.effective_code(code) * self.units_ma
    }
}
