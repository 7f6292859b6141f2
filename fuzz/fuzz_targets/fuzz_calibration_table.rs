//! Fuzz target: calibration table validation and lookup
//!
//! Builds a table from arbitrary (raw, celsius) pairs and, when it is
//! accepted, checks every conversion:
//! - No panics for any raw value
//! - Results never leave the table's temperature range
//! - Whole-degree and 0.1 °C conversions agree to within half a degree
//!
//! cargo fuzz run fuzz_calibration_table

#![no_main]

use fived_hw::thermistor::{
    CalibrationSample, CalibrationTable, DECI, resolve_decicelsius, resolve_temperature,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let adc_max = u16::from_le_bytes([data[0], data[1]]);
    let samples: Vec<CalibrationSample> = data[2..]
        .chunks_exact(4)
        .map(|c| {
            CalibrationSample::new(
                u16::from_le_bytes([c[0], c[1]]),
                i16::from_le_bytes([c[2], c[3]]),
            )
        })
        .collect();

    let Ok(table) = CalibrationTable::new(&samples, adc_max) else {
        return;
    };

    let lo = table.first().celsius.min(table.last().celsius);
    let hi = table.first().celsius.max(table.last().celsius);
    let _ = table.coarsest_step();

    for raw in [0, 1, adc_max / 2, adc_max, u16::MAX]
        .into_iter()
        .chain(table.samples().iter().map(|s| s.raw.saturating_add(1)))
    {
        let whole = resolve_temperature(&table, raw);
        assert!((lo..=hi).contains(&whole), "raw {raw} -> {whole} outside {lo}..={hi}");

        let deci = resolve_decicelsius(&table, raw);
        assert!(
            (i32::from(whole) * DECI - deci).abs() <= DECI / 2,
            "raw {raw}: {whole} vs {deci}"
        );
    }
});
