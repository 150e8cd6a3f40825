//! EnviroHealthMonitor - firmware entry point (ESP32).
//!
//! Bring-up order:
//! 1. I2C master on GPIO21/22 (both sensors share the bus)
//! 2. UART1 diagnostics drain
//! 3. AS7262 spectral sensor + driver LED
//! 4. MAX30102 PPG sensor in SpO2 mode
//! 5. NimBLE GATT server: telemetry service + notify characteristic,
//!    advertising as "EnviroHealthMonitor"
//! 6. 1 Hz acquisition loop: measure, pipeline, telemetry, notify, log

#![no_std]
#![no_main]

use esp_idf_svc::sys as esp_idf_sys;

use embedded_hal::i2c::I2c;
use esp32_nimble::utilities::BleUuid;
use esp32_nimble::{uuid128, BLEAdvertisementData, BLEDevice, NimbleProperties, NimbleSub};
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{self, UartTxDriver};
use esp_idf_svc::hal::units::FromValueType;

use enviro_health_monitor::ble::DEVICE_NAME;
use enviro_health_monitor::hal::{As726x, As726xConfig, Max3010x, Max3010xConfig, SensorError};
use enviro_health_monitor::logging::{self, LogStream};
use enviro_health_monitor::{
    diag_error, diag_info, diag_warn, CycleSample, FaultCode, FaultState, MonitorConfig,
    PpgPipeline, TelemetryLink, TelemetryRecord,
};

// NimBLE wants its UUIDs in its own wire representation; these must stay in
// sync with ble::TELEMETRY_SERVICE_UUID / ble::TELEMETRY_CHAR_UUID.
const SERVICE_UUID: BleUuid = uuid128!("4fafc201-1fb5-459e-8fcc-c5c9c331914b");
const CHAR_UUID: BleUuid = uuid128!("beb5483e-36e1-4688-b7f5-ea07361b26a8");

// Static state. Acquisition is single-threaded; these are atomics so the
// NimBLE callbacks can also touch them.
static FAULT: FaultState = FaultState::new();
static LOG: LogStream = LogStream::new();
static LINK: TelemetryLink = TelemetryLink::new();

fn timestamp_us() -> i64 {
    unsafe { esp_idf_sys::esp_timer_get_time() }
}

#[no_mangle]
fn main() {
    esp_idf_sys::link_patches();

    let peripherals = Peripherals::take().expect("peripherals already taken");

    let i2c_config = I2cConfig::new().baudrate(100.kHz().into());
    let mut i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21, // SDA
        peripherals.pins.gpio22, // SCL
        &i2c_config,
    )
    .expect("i2c init failed");

    let uart_config = uart::config::Config::default().baudrate(115_200.Hz());
    let mut uart = UartTxDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
    .expect("uart init failed");

    // Sensor init failures are fatal: with a sensor missing there is
    // nothing to monitor, so halt where the panic message is readable.
    let mut spectral = As726x::new(As726xConfig::default());
    spectral.init(&mut i2c).expect("AS7262 not found");
    spectral
        .enable_drv_led(&mut i2c)
        .expect("AS7262 LED enable failed");

    let mut ppg = Max3010x::new(Max3010xConfig::default());
    ppg.init(&mut i2c).expect("MAX30102 not found");

    // GATT server: one service, one notify characteristic. The callbacks
    // only toggle LINK's atomics; the acquisition loop decides per cycle
    // whether a record goes to the radio.
    let ble_device = BLEDevice::take();
    let server = ble_device.get_server();
    server.on_connect(|_server, _desc| LINK.on_connect());
    server.on_disconnect(|_desc, _reason| LINK.on_disconnect());

    let service = server.create_service(SERVICE_UUID);
    let telemetry_char = service
        .lock()
        .create_characteristic(CHAR_UUID, NimbleProperties::READ | NimbleProperties::NOTIFY);
    telemetry_char.lock().on_subscribe(|_characteristic, _desc, sub| {
        LINK.set_notify(sub.contains(NimbleSub::NOTIFY));
    });

    let advertising = ble_device.get_advertising();
    advertising
        .lock()
        .set_data(
            BLEAdvertisementData::new()
                .name(DEVICE_NAME)
                .add_service_uuid(SERVICE_UUID),
        )
        .expect("ble advertising data failed");
    advertising.lock().start().expect("ble advertising start failed");

    diag_info!(LOG, timestamp_us(), "sensors ready, advertising as {}", DEVICE_NAME);

    let config = MonitorConfig::default();
    let mut pipeline = PpgPipeline::new(&config);
    let mut cycle: u32 = 0;

    loop {
        cycle = cycle.wrapping_add(1);

        match run_cycle(&mut i2c, &mut spectral, &mut ppg, &mut pipeline) {
            Ok(record) => {
                FAULT.clear();
                let line = record.encode();
                if LINK.submit(&record) {
                    telemetry_char.lock().set_value(line.as_bytes()).notify();
                } else if LINK.is_connected() {
                    // Connected but not subscribed: the client stopped reading.
                    FAULT.set(FaultCode::TransportStall, LINK.records_dropped());
                }
                diag_info!(LOG, timestamp_us(), "{}", line.as_str());
            }
            Err(err) => {
                let code = match err {
                    SensorError::Timeout => FaultCode::SensorTimeout,
                    SensorError::NotFound => FaultCode::SensorNotFound,
                    SensorError::Bus(_) => FaultCode::BusError,
                };
                FAULT.set(code, cycle);
                diag_error!(LOG, timestamp_us(), "cycle {} skipped: {:?}", cycle, err);
            }
        }

        let dropped = LOG.dropped();
        if dropped > 0 {
            LOG.reset_dropped();
            diag_warn!(LOG, timestamp_us(), "log ring dropped {} entries", dropped);
        }
        drain_log(&mut uart);

        FreeRtos::delay_ms(config.cycle_period_ms);
    }
}

/// One sampling cycle: spectral measurement with a bounded data-ready wait,
/// PPG FIFO read, pipeline, record. Any sensor error skips the cycle and the
/// caller retries next period.
fn run_cycle<B: I2c>(
    i2c: &mut B,
    spectral: &mut As726x,
    ppg: &mut Max3010x,
    pipeline: &mut PpgPipeline,
) -> Result<TelemetryRecord, SensorError<B::Error>> {
    spectral.start_measurement(i2c)?;
    spectral.wait_data_ready(i2c, FreeRtos::delay_ms)?;

    let violet = spectral.read_violet(i2c)?;
    let blue = spectral.read_blue(i2c)?;
    let (ir, red) = ppg.read_sample(i2c)?;

    let sample = CycleSample {
        violet,
        blue,
        ir,
        red,
    };
    let metrics = pipeline.process(&sample);
    Ok(TelemetryRecord::new(&sample, &metrics))
}

/// Drain pending diagnostics to UART.
fn drain_log(uart: &mut UartTxDriver<'_>) {
    let mut buf = [0u8; 160];
    while let Some(entry) = LOG.drain() {
        let len = logging::format_entry(&entry, &mut buf);
        let _ = uart.write(&buf[..len]);
    }
}
