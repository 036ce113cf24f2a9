//! Resistor-ladder current-limit model.

/// Analog model of a DAC-driven resistor ladder feeding the driver's current-set pin.
///
/// The DAC switches a bank of `codes` equal resistors between a top leg (to the DAC
/// reference) and a bottom leg (to ground). The ladder's Thevenin equivalent drives
/// the current-set node through `r_top_fixed`, while `r_bottom_fixed` ties that node
/// to ground. The driver sources a current from the node that sets the coil current
/// through `calibration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResistorLadder {
    /// Number of DAC levels.
    pub codes: u8,
    /// Resistance of one ladder unit (ohms).
    pub unit_resistance: f64,
    /// Voltage the driver holds on the current-set node (volts).
    pub v_ref: f64,
    /// Voltage at the top of the ladder (volts).
    pub v_dac_top: f64,
    /// Fixed resistor between the ladder output and the current-set node (ohms).
    pub r_top_fixed: f64,
    /// Fixed resistor between the current-set node and ground (ohms).
    pub r_bottom_fixed: f64,
    /// Coil amps per amp sourced from the current-set node.
    pub calibration: f64,
}

impl ResistorLadder {
    /// Coil current in milliamps at `dac_level`, before rounding.
    pub fn current_ma(&self, dac_level: u32) -> f64 {
        let n = self.codes as f64;
        let level = dac_level as f64;

        let r_dac_top = (n - level) * self.unit_resistance;
        let r_dac_bottom = level * self.unit_resistance;

        let v_dac_out = self.v_dac_top * r_dac_bottom / (r_dac_bottom + r_dac_top);

        // Bottom leg shorted at level 0.
        let r_dac_out = if dac_level == 0 {
            0.0
        } else {
            1.0 / (1.0 / r_dac_top + 1.0 / r_dac_bottom)
        };

        let sourced = (self.v_ref - v_dac_out) / (self.r_top_fixed + r_dac_out)
            + self.v_ref / self.r_bottom_fixed;

        sourced * self.calibration * 1000.0
    }
}
