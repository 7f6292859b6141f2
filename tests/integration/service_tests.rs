//! Startup path: stored config → `HardwareService` → temperature reads.

use super::mock_adc::ScriptedAdc;

use fived_hw::Error;
use fived_hw::adapters::config_store::BlobConfigStore;
use fived_hw::adapters::sim_adc::SimulatedAdc;
use fived_hw::app::ports::{ConfigError, ConfigPort};
use fived_hw::app::service::HardwareService;
use fived_hw::config::FirmwareConfig;
use fived_hw::error::{BoardError, CalibrationError, SensorError};
use fived_hw::thermistor::{CalibrationSample, Coverage};

fn boot(store: &BlobConfigStore) -> Result<HardwareService, Error> {
    let config = store.load().expect("stored config should load");
    HardwareService::init(&config)
}

// ── Happy path ────────────────────────────────────────────────

#[test]
fn default_config_boots_two_extruder_sanguino() {
    let service = boot(&BlobConfigStore::new()).unwrap();
    assert_eq!(service.thermometers().len(), 2);
    assert_eq!(service.convert(609), Some(100));
}

#[test]
fn persisted_config_drives_averaged_reads() {
    let store = BlobConfigStore::new();
    let mut cfg = FirmwareConfig::default();
    cfg.board_id = 4;
    cfg.temperature_samples = 4;
    store.save(&cfg).unwrap();

    let service = boot(&store).unwrap();
    let channel = service.thermometers()[0].channel();
    let mut adc = ScriptedAdc::new().script(channel, &[600, 610, 608, 618]);

    let reading = service.read_temperature(0, &mut adc).unwrap();
    assert_eq!(reading.raw, 609);
    assert_eq!(reading.celsius, 100);
    assert!(!reading.clamped());
    assert_eq!(adc.reads, vec![channel; 4]);
    assert_eq!(adc.remaining(channel), 0);
}

#[test]
fn open_thermistor_reads_clamped() {
    let service = boot(&BlobConfigStore::new()).unwrap();
    let mut adc = SimulatedAdc::new(1023);
    let reading = service.read_temperature(1, &mut adc).unwrap();
    assert_eq!(reading.celsius, 0);
    assert_eq!(reading.coverage, Coverage::AboveRange);
}

#[test]
fn custom_calibration_table_is_used() {
    let mut cfg = FirmwareConfig::default();
    cfg.calibration = Some(
        [CalibrationSample::new(100, 200), CalibrationSample::new(900, 20)]
            .into_iter()
            .collect(),
    );
    let service = HardwareService::init(&cfg).unwrap();
    assert_eq!(service.calibration().map(|t| t.len()), Some(2));
    assert_eq!(service.convert(500), Some(110));
}

// ── Failures ──────────────────────────────────────────────────

#[test]
fn rs485_board_has_no_local_conversion() {
    let mut cfg = FirmwareConfig::default();
    cfg.board_id = 2;
    let service = HardwareService::init(&cfg).unwrap();
    assert!(service.calibration().is_none());
    assert_eq!(service.convert(500), None);

    let mut adc = SimulatedAdc::new(500);
    assert!(matches!(
        service.read_temperature(0, &mut adc),
        Err(Error::Sensor(SensorError::ChannelUnassigned(_)))
    ));
}

#[test]
fn unsupported_board_aborts_startup() {
    let mut cfg = FirmwareConfig::default();
    cfg.board_id = 7;
    assert!(matches!(
        HardwareService::init(&cfg),
        Err(Error::Board(BoardError::UnsupportedBoard(7)))
    ));
}

#[test]
fn malformed_calibration_aborts_startup() {
    let mut cfg = FirmwareConfig::default();
    cfg.calibration = Some(
        [
            CalibrationSample::new(100, 200),
            CalibrationSample::new(100, 150),
        ]
        .into_iter()
        .collect(),
    );
    assert!(matches!(
        HardwareService::init(&cfg),
        Err(Error::Calibration(CalibrationError::RawNotIncreasing { index: 1 }))
    ));
}

#[test]
fn narrow_adc_rejects_reference_table() {
    let store = BlobConfigStore::new();
    let mut cfg = FirmwareConfig::default();
    cfg.adc_max = 511;
    store.save(&cfg).unwrap();
    assert!(matches!(
        boot(&store),
        Err(Error::Calibration(CalibrationError::RawAboveAdcMax { .. }))
    ));
}

#[test]
fn adc_failure_surfaces_as_sensor_error() {
    let service = boot(&BlobConfigStore::new()).unwrap();
    let mut adc = SimulatedAdc::new(500);
    adc.set_failed(true);
    assert!(matches!(
        service.read_temperature(0, &mut adc),
        Err(Error::Sensor(SensorError::AdcReadFailed))
    ));
}

#[test]
fn corrupted_store_is_reported_before_boot() {
    let store = BlobConfigStore::new();
    store.set_blob(vec![0xde, 0xad]);
    assert!(matches!(store.load(), Err(ConfigError::Corrupted)));
}
