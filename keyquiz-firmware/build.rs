//! Build script for keyquiz-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates keyquiz.toml at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs wired to the display SPI bus (SCK, DIN)
const SPI_PINS: [i64; 2] = [18, 19];

fn main() {
    setup_linker();
    validate_config();
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

/// Validate keyquiz.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=keyquiz.toml");

    let config_path = Path::new("keyquiz.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: keyquiz.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds keyquiz.toml from the keyquiz-firmware      ║\n\
            ║  directory. Restore it or create a new one.                      ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read keyquiz.toml                              ║\n\
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
                ║  ERROR: Invalid TOML syntax in keyquiz.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_required_sections(&config, &mut errors);
    let cs_pin = validate_display(&config, &mut errors);
    validate_keypad(&config, cs_pin, &mut errors);
    validate_quiz(&config, &mut errors);
    report("keyquiz.toml", &errors);

    println!("cargo:warning=keyquiz.toml validated successfully");
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

/// Abort the build listing every problem found
fn report(what: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid configuration in {:<31} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        what,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn validate_required_sections(config: &toml::Value, errors: &mut Vec<String>) {
    for section in ["display", "keypad", "quiz"] {
        match config.get(section) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", section)),
            None => errors.push(format!("missing [{}] section", section)),
        }
    }
}

/// Check an optional integer key against an inclusive range
fn check_range(
    table: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => None,
    }
}

/// Returns the chip-select pin so the keypad check can reject overlaps
fn validate_display(config: &toml::Value, errors: &mut Vec<String>) -> i64 {
    let Some(display) = config.get("display") else {
        return 17;
    };

    let cascade = check_range(display, "display", "cascade_size", 1, 8, errors).unwrap_or(1);
    check_range(display, "display", "digits", 0, cascade * 8, errors);
    check_range(display, "display", "brightness", 0, 15, errors);
    check_range(display, "display", "clock_hz", 1, 10_000_000, errors);

    if let Some(value) = display.get("mirrored") {
        if !value.is_bool() {
            errors.push("[display] mirrored must be true or false".to_string());
        }
    }

    let cs_pin = check_range(display, "display", "cs_pin", 0, 29, errors).unwrap_or(17);
    if SPI_PINS.contains(&cs_pin) {
        errors.push(format!("[display] cs_pin {} is used by the SPI bus", cs_pin));
    }
    cs_pin
}

fn validate_keypad(config: &toml::Value, cs_pin: i64, errors: &mut Vec<String>) {
    let Some(keypad) = config.get("keypad") else {
        return;
    };

    let mut seen = HashSet::from([cs_pin]);
    let mut counts = [4usize, 4usize];

    for (i, name) in ["rows", "cols"].into_iter().enumerate() {
        let Some(value) = keypad.get(name) else {
            continue;
        };
        let Some(pins) = value.as_array() else {
            errors.push(format!("[keypad] {} must be an array of pins", name));
            continue;
        };
        if pins.is_empty() || pins.len() > 8 {
            errors.push(format!("[keypad] {} needs 1-8 pins", name));
        }
        counts[i] = pins.len();

        for pin in pins {
            match pin.as_integer() {
                Some(p) if (0..=29).contains(&p) => {
                    if SPI_PINS.contains(&p) {
                        errors.push(format!("[keypad] pin {} is used by the SPI bus", p));
                    } else if !seen.insert(p) {
                        errors.push(format!("[keypad] pin {} is assigned twice", p));
                    }
                }
                _ => errors.push(format!("[keypad] {} entries must be pins 0-29", name)),
            }
        }
    }

    match keypad.get("keys") {
        Some(toml::Value::String(keys)) => {
            let expected = counts[0] * counts[1];
            if keys.chars().count() != expected {
                errors.push(format!(
                    "[keypad] keys needs {} symbols, has {}",
                    expected,
                    keys.chars().count()
                ));
            }
        }
        Some(_) => errors.push("[keypad] keys must be a string".to_string()),
        None => {
            if counts != [4, 4] {
                errors.push("[keypad] keys is required for a non-4x4 keypad".to_string());
            }
        }
    }

    for key in ["debounce_ms", "settle_ms", "poll_ms"] {
        check_range(keypad, "keypad", key, 0, u32::MAX as i64, errors);
    }
}

fn validate_quiz(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(quiz) = config.get("quiz") else {
        return;
    };

    let max = u32::MAX as i64;
    let initial = check_range(quiz, "quiz", "initial_budget_ms", 1, max, errors).unwrap_or(15_000);
    let floor = check_range(quiz, "quiz", "min_budget_ms", 1, max, errors).unwrap_or(1_000);
    if floor > initial {
        errors.push("[quiz] min_budget_ms exceeds initial_budget_ms".to_string());
    }

    check_range(quiz, "quiz", "streak_to_level", 1, 255, errors);
    check_range(quiz, "quiz", "max_operand", 1, 5, errors);
    for key in [
        "level_step_ms",
        "level_step_growth_ms",
        "refresh_ms",
        "feedback_ms",
        "level_up_ms",
    ] {
        check_range(quiz, "quiz", key, 0, max, errors);
    }
}
