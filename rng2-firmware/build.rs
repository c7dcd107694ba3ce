//! Build script for rng2-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates rng2.toml at compile time
//! - Generates board_config.rs (bus pins, speed, address, poll interval)

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Number of GPIOs on the RP2040
const GPIO_COUNT: i64 = 30;

fn main() {
    setup_linker();
    let board = validate_config();
    generate_board_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated board settings
struct Board {
    scl: u8,
    sda: u8,
    frequency_hz: u32,
    stretch_timeout_us: u32,
    address: u8,
    poll_interval_ms: u64,
}

/// Validate rng2.toml and extract the board settings
fn validate_config() -> Board {
    println!("cargo:rerun-if-changed=rng2.toml");

    let config_path = Path::new("rng2.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rng2.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires an rng2.toml configuration file with      ║\n\
            ║  [bus], [device] and [app] sections in the rng2-firmware         ║\n\
            ║  directory.                                                      ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read rng2.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in rng2.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let scl = pin_field(&config, "scl", &mut errors);
    let sda = pin_field(&config, "sda", &mut errors);
    if let (Some(scl), Some(sda)) = (scl, sda) {
        if scl == sda {
            errors.push(format!("[bus] scl and sda are both gpio{}", scl));
        }
    }

    let frequency_hz = int_field(&config, "bus", "frequency_hz", 1, 1_000_000, &mut errors);
    let stretch_timeout_us =
        int_field(&config, "bus", "stretch_timeout_us", 1, 1_000_000, &mut errors);
    let address = int_field(&config, "device", "address", 0x08, 0x77, &mut errors);
    let poll_interval_ms = int_field(&config, "app", "poll_interval_ms", 1, 3_600_000, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in rng2.toml                       ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=rng2.toml validated successfully");

    // Every field was checked above
    Board {
        scl: scl.unwrap(),
        sda: sda.unwrap(),
        frequency_hz: frequency_hz.unwrap() as u32,
        stretch_timeout_us: stretch_timeout_us.unwrap() as u32,
        address: address.unwrap() as u8,
        poll_interval_ms: poll_interval_ms.unwrap() as u64,
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read `[bus] <key> = "gpioN"`
fn pin_field(config: &toml::Value, key: &str, errors: &mut Vec<String>) -> Option<u8> {
    let value = match config.get("bus").and_then(|b| b.get(key)) {
        Some(toml::Value::String(s)) => s,
        Some(_) => {
            errors.push(format!("[bus] {} must be a string like \"gpio5\"", key));
            return None;
        }
        None => {
            errors.push(format!("[bus] missing '{}'", key));
            return None;
        }
    };

    let pin = value
        .trim()
        .strip_prefix("gpio")
        .and_then(|n| n.parse::<i64>().ok())
        .filter(|n| (0..GPIO_COUNT).contains(n));

    match pin {
        Some(n) => Some(n as u8),
        None => {
            errors.push(format!("[bus] {} = \"{}\" is not gpio0..gpio29", key, value));
            None
        }
    }
}

/// Read an integer field and check its range
fn int_field(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(n)) if (min..=max).contains(n) => Some(*n),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Write board_config.rs into OUT_DIR
fn generate_board_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let source = format!(
        "// Generated by build.rs from rng2.toml\n\
         \n\
         /// SCL GPIO number\n\
         pub const SCL_PIN: u8 = {scl};\n\
         /// SDA GPIO number\n\
         pub const SDA_PIN: u8 = {sda};\n\
         /// Bus clock frequency in Hz\n\
         pub const I2C_FREQUENCY_HZ: u32 = {freq};\n\
         /// Clock-stretch bound in µs\n\
         pub const STRETCH_TIMEOUT_US: u32 = {stretch};\n\
         /// 7-bit device address\n\
         pub const DEVICE_ADDRESS: u8 = {addr:#04x};\n\
         /// Delay between random number reads\n\
         pub const POLL_INTERVAL_MS: u64 = {poll};\n\
         \n\
         /// Take the configured (SCL, SDA) pins from the peripherals\n\
         macro_rules! take_bus_pins {{\n    \
             ($p:expr) => {{\n        \
                 (\n            \
                     rng2_hal_rp2040::take_pin!($p, {scl}),\n            \
                     rng2_hal_rp2040::take_pin!($p, {sda}),\n        \
                 )\n    \
             }};\n\
         }}\n",
        scl = board.scl,
        sda = board.sda,
        freq = board.frequency_hz,
        stretch = board.stretch_timeout_us,
        addr = board.address,
        poll = board.poll_interval_ms,
    );

    let mut f = File::create(out_dir.join("board_config.rs")).unwrap();
    f.write_all(source.as_bytes()).unwrap();
}
