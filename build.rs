// EnviroHealthMonitor - Build Script

fn main() {
    // ESP-IDF environment setup, only when building the firmware binary.
    if std::env::var("CARGO_FEATURE_ESP32").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
