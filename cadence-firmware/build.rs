//! Build script for cadence-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates scheduler.toml at compile time
//! - Generates the scheduler constants compiled into the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// RP2040 core clock cycles per microsecond
const CYCLES_PER_US: u64 = 125;

/// SysTick reload register width
const SYST_RELOAD_MAX: u64 = 0x00FF_FFFF;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_constants(&config);
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

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Values read from scheduler.toml
struct SchedulerToml {
    tick_us: u64,
    hung: u64,
    event_dump: u64,
    scheduler_dump: u64,
    platform_dump: u64,
    fatal: u64,
    heartbeat_ms: u64,
    report_ms: u64,
}

/// Validate scheduler.toml configuration at compile time
fn validate_config() -> SchedulerToml {
    println!("cargo:rerun-if-changed=scheduler.toml");

    let config_path = Path::new("scheduler.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: scheduler.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a scheduler.toml configuration file.      ║\n\
            ║  Please create one in the cadence-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read scheduler.toml                            ║\n\
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
                ║  ERROR: Invalid TOML syntax in scheduler.toml                    ║\n\
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

    let tick_us = read_u64(&config, "tick", "period_us", &mut errors);
    let hung = read_u64(&config, "watchdog", "hung", &mut errors);
    let event_dump = read_u64(&config, "watchdog", "event_dump", &mut errors);
    let scheduler_dump = read_u64(&config, "watchdog", "scheduler_dump", &mut errors);
    let platform_dump = read_u64(&config, "watchdog", "platform_dump", &mut errors);
    let fatal = read_u64(&config, "watchdog", "fatal", &mut errors);
    let heartbeat_ms = read_u64(&config, "tasks", "heartbeat_ms", &mut errors);
    let report_ms = read_u64(&config, "tasks", "report_ms", &mut errors);

    if tick_us == 0 {
        errors.push("[tick] period_us must be greater than 0".to_string());
    } else if tick_us * CYCLES_PER_US > SYST_RELOAD_MAX + 1 {
        errors.push(format!(
            "[tick] period_us must be at most {}",
            (SYST_RELOAD_MAX + 1) / CYCLES_PER_US
        ));
    }

    let stages = [hung, event_dump, scheduler_dump, platform_dump, fatal];
    if hung == 0 || stages.windows(2).any(|w| w[0] >= w[1]) {
        errors.push("[watchdog] thresholds must be nonzero and strictly increasing".to_string());
    }
    if stages.iter().any(|&s| s > u64::from(u32::MAX)) {
        errors.push("[watchdog] thresholds must fit in 32 bits".to_string());
    }

    for (key, ms) in [("heartbeat_ms", heartbeat_ms), ("report_ms", report_ms)] {
        if tick_us > 0 && ms * 1000 / tick_us <= 1 {
            errors.push(format!("[tasks] {} must span at least two ticks", key));
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid scheduler configuration                          ║\n\
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

    println!("cargo:warning=scheduler.toml validated successfully");

    SchedulerToml {
        tick_us,
        hung,
        event_dump,
        scheduler_dump,
        platform_dump,
        fatal,
        heartbeat_ms,
        report_ms,
    }
}

/// Read a non-negative integer from `[section] key`
fn read_u64(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> u64 {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(v)) if *v >= 0 => *v as u64,
        Some(_) => {
            errors.push(format!("[{}] {} must be a non-negative integer", section, key));
            0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            0
        }
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

/// Write `scheduler_config.rs` into OUT_DIR
fn generate_constants(config: &SchedulerToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("scheduler_config.rs")).unwrap();

    writeln!(f, "/// Length of one tick in microseconds").unwrap();
    writeln!(f, "pub const TICK_US: u32 = {};", config.tick_us).unwrap();
    writeln!(f, "/// SysTick reload value for one tick").unwrap();
    writeln!(
        f,
        "pub const SYST_RELOAD: u32 = {};",
        config.tick_us * CYCLES_PER_US - 1
    )
    .unwrap();
    writeln!(f, "/// Watchdog escalation thresholds, in skipped sweeps").unwrap();
    writeln!(
        f,
        "pub const STALL: cadence_core::StallThresholds = cadence_core::StallThresholds {{ \
         hung: {}, event_dump: {}, scheduler_dump: {}, platform_dump: {}, fatal: {} }};",
        config.hung, config.event_dump, config.scheduler_dump, config.platform_dump, config.fatal
    )
    .unwrap();
    writeln!(f, "/// Heartbeat period in ticks").unwrap();
    writeln!(
        f,
        "pub const HEARTBEAT_PERIOD: u32 = {};",
        config.heartbeat_ms * 1000 / config.tick_us
    )
    .unwrap();
    writeln!(f, "/// Status report period in ticks").unwrap();
    writeln!(
        f,
        "pub const REPORT_PERIOD: u32 = {};",
        config.report_ms * 1000 / config.tick_us
    )
    .unwrap();
}
