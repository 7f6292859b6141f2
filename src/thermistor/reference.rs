//! Reference calibration for the RepRap temperature sensor board.
//!
//! EPCOS B57560G560 100 kΩ NTC with r2 = 4650 Ω on a 10-bit ADC
//! (max reading 1022).  Trailing comments give the thermistor resistance
//! in kΩ at each point.

use super::{CalibrationSample, CalibrationTable};
use crate::error::CalibrationError;

/// Full-scale reading of the AVR 10-bit ADC.
pub const ADC_MAX: u16 = 1023;

const fn s(raw: u16, celsius: i16) -> CalibrationSample {
    CalibrationSample::new(raw, celsius)
}

pub const EPCOS_B57560: [CalibrationSample; 26] = [
    s(30, 300),   // 0.139
    s(39, 280),   // 0.1814
    s(51, 260),   // 0.2415
    s(68, 240),   // 0.3286
    s(92, 220),   // 0.4581
    s(127, 200),  // 0.6559
    s(177, 180),  // 0.968
    s(248, 160),  // 1.479
    s(293, 150),  // 1.853
    s(345, 140),  // 2.348
    s(403, 130),  // 3.009
    s(435, 125),  // 3.417
    s(468, 120),  // 3.893
    s(537, 110),  // 5.112
    s(609, 100),  // 6.8
    s(681, 90),   // 9.177
    s(749, 80),   // 12.58
    s(810, 70),   // 17.52
    s(863, 60),   // 24.88
    s(907, 50),   // 36.03
    s(942, 40),   // 53.27
    s(968, 30),   // 80.57
    s(979, 25),   // 100
    s(987, 20),   // 124.9
    s(1001, 10),  // 199
    s(1010, 0),   // 326.5
];

/// Build the reference table, validated against the ADC's full-scale
/// reading.  A narrower ADC than the table was measured on is rejected.
pub fn epcos_b57560(adc_max: u16) -> Result<CalibrationTable, CalibrationError> {
    CalibrationTable::new(&EPCOS_B57560, adc_max)
}
