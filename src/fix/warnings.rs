//! Warning collector.

use core::fmt::{self, Write};

use heapless::{String, Vec};

/// Longest single warning line.
pub const MAX_WARNING_LEN: usize = 192;

/// Most warnings one fix pass can record.
pub const MAX_WARNINGS: usize = 48;

/// One warning line, ending in `\n`.
pub type Warning = String<MAX_WARNING_LEN>;

/// Ordered warnings produced by one fix pass.
///
/// Lines are only ever appended. With the `defmt` feature each line is also logged
/// at debug level as it is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    lines: Vec<Warning, MAX_WARNINGS>,
}

impl Warnings {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Record `Warning: <args>.\n`.
    ///
    /// Text past [`MAX_WARNING_LEN`] is cut off; lines past [`MAX_WARNINGS`] are
    /// dropped.
    pub(crate) fn push(&mut self, args: fmt::Arguments<'_>) {
        let mut line = Warning::new();
        let _ = write!(Truncating(&mut line), "Warning: {}.", args);
        let _ = line.push('\n');

        #[cfg(feature = "defmt")]
        defmt::debug!("settings fix: {=str}", line.as_str());

        let _ = self.lines.push(line);
    }

    /// Number of warnings.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if no warnings were recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over the lines in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.as_str())
    }
}

/// Writer that stops one byte short of a full line, leaving room for the `\n`.
struct Truncating<'a>(&'a mut Warning);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.len() + c.len_utf8() >= MAX_WARNING_LEN {
                break;
            }
            let _ = self.0.push(c);
        }
        Ok(())
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Append a warning to a [`Warnings`] collector with `format!` syntax.
macro_rules! warn_fix {
    ($warnings:expr, $($arg:tt)*) => {
        $warnings.push(format_args!($($arg)*))
    };
}

pub(crate) use warn_fix;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let mut warnings = Warnings::new();
        warn_fix!(warnings, "The serial device number was too high so it will be changed to {}", 127);
        assert_eq!(
            warnings.iter().next(),
            Some("Warning: The serial device number was too high so it will be changed to 127.\n")
        );
    }

    #[test]
    fn test_overlong_line_still_ends_in_newline() {
        let mut warnings = Warnings::new();
        let long = [b'x'; 300];
        warn_fix!(warnings, "{}", core::str::from_utf8(&long).unwrap());
        let line = warnings.iter().next().unwrap();
        assert_eq!(line.len(), MAX_WARNING_LEN);
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_display_concatenates() {
        let mut warnings = Warnings::new();
        warn_fix!(warnings, "A");
        warn_fix!(warnings, "B");
        let mut out = heapless::String::<64>::new();
        write!(out, "{}", warnings).unwrap();
        assert_eq!(out.as_str(), "Warning: A.\nWarning: B.\n");
    }
}
