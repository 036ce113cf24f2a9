//! Unit conversions for stored settings values.
//!
//! The controller stores some quantities in hardware units rather than the units a
//! person would type. These helpers convert between the two so the fixer can round
//! a requested value to one the hardware can reproduce.

/// Clock feeding the serial baud generator (Hz).
pub const BAUD_CLOCK_HZ: u32 = 12_000_000;

/// Speed units per step/s. Speeds are stored in steps per 10000 s.
pub const SPEED_UNITS_PER_HZ: u32 = 10_000;

/// Baud generator divisor that best reproduces `baud`.
///
/// `baud` must be non-zero.
#[inline]
pub const fn baud_to_generator(baud: u32) -> u32 {
    (BAUD_CLOCK_HZ + baud / 2) / baud
}

/// Baud rate produced by the generator divisor `generator`.
///
/// `generator` must be non-zero.
#[inline]
pub const fn generator_to_baud(generator: u32) -> u32 {
    (BAUD_CLOCK_HZ + generator / 2) / generator
}

/// Closest baud rate the generator can actually produce.
///
/// Zero maps to zero. Applying this twice gives the same result as applying it
/// once for every rate in the controller's allowed range.
#[inline]
pub const fn achievable_baud_rate(baud: u32) -> u32 {
    if baud == 0 {
        return 0;
    }
    generator_to_baud(baud_to_generator(baud))
}

/// Whole kilohertz represented by a stored speed.
#[inline]
pub const fn speed_to_khz(speed: u32) -> u32 {
    speed / SPEED_UNITS_PER_HZ / 1000
}
