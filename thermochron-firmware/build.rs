//! Build script for thermochron-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates thermochron.toml at compile time
//! - Generates `$OUT_DIR/config.rs` from the validated values

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Job limits accepted by the console (keep in sync with thermochron-protocol)
const TEMP_MIN_C: i64 = 45;
const TEMP_MAX_C: i64 = 65;
const TIME_MAX_H: i64 = 24;

fn main() {
    setup_linker();
    let config = load_config();
    let values = validate_config(&config);
    generate_config(&values);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse thermochron.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=thermochron.toml");

    let config_path = Path::new("thermochron.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: thermochron.toml not found!                              ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a thermochron.toml configuration file.    ║\n\
            ║  Please create one in the thermochron-firmware directory.        ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read thermochron.toml                          ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in thermochron.toml                  ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Values baked into the firmware
struct ConfigValues {
    active_low: bool,
    max_temp: i64,
    hysteresis: i64,
    poll_interval_ms: i64,
    temp: i64,
    time: i64,
    baudrate: i64,
}

/// Validate every section, collecting all problems before failing
fn validate_config(config: &toml::Value) -> ConfigValues {
    let mut errors = Vec::new();

    let heater = table(config, "heater", &mut errors);
    let job = table(config, "job", &mut errors);
    let console = table(config, "console", &mut errors);

    let active_low = heater
        .and_then(|t| boolean(t, "heater", "active_low", &mut errors))
        .unwrap_or(false);
    let max_temp = heater
        .and_then(|t| integer(t, "heater", "max_temp", TEMP_MAX_C, 125, &mut errors))
        .unwrap_or(0);
    let hysteresis = heater
        .and_then(|t| integer(t, "heater", "hysteresis", 1, 10, &mut errors))
        .unwrap_or(0);
    let poll_interval_ms = heater
        .and_then(|t| integer(t, "heater", "poll_interval_ms", 50, 60_000, &mut errors))
        .unwrap_or(0);

    let temp = job
        .and_then(|t| integer(t, "job", "temp", TEMP_MIN_C, TEMP_MAX_C, &mut errors))
        .unwrap_or(0);
    let time = job
        .and_then(|t| integer(t, "job", "time", 0, TIME_MAX_H, &mut errors))
        .unwrap_or(0);

    let baudrate = console
        .and_then(|t| integer(t, "console", "baudrate", 1_200, 921_600, &mut errors))
        .unwrap_or(0);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in thermochron.toml                ║\n\
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

    println!("cargo:warning=thermochron.toml validated successfully");

    ConfigValues {
        active_low,
        max_temp,
        hysteresis,
        poll_interval_ms,
        temp,
        time,
        baudrate,
    }
}

fn table<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => {
            errors.push(format!("Missing [{}] section", name));
            None
        }
    }
}

fn boolean(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<bool> {
    match table.get(key) {
        Some(toml::Value::Boolean(b)) => Some(*b),
        Some(_) => {
            errors.push(format!("[{}] '{}' must be true or false", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

fn integer(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] '{}' must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] '{}' must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Write the validated values as Rust constants
fn generate_config(values: &ConfigValues) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("config.rs")).unwrap();

    writeln!(
        f,
        "pub const HEATER: HeaterConfig = HeaterConfig {{\n    \
             max_temp_c: {},\n    \
             hysteresis_c: {},\n    \
             active_low: {},\n    \
             poll_interval_ms: {},\n\
         }};\n",
        values.max_temp, values.hysteresis, values.active_low, values.poll_interval_ms
    )
    .unwrap();

    writeln!(
        f,
        "pub const JOB_DEFAULTS: JobDefaults = JobDefaults {{\n    \
             temp_c: {},\n    \
             duration_h: {},\n\
         }};\n",
        values.temp, values.time
    )
    .unwrap();

    writeln!(f, "pub const CONSOLE_BAUDRATE: u32 = {};", values.baudrate).unwrap();
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
