// SPDX-License-Identifier: GPL-3.0-only

//! Formatting helpers shared by the models and the command-line tools

use num_format::{Locale, ToFormattedString};

/// Absolute zero offset used by UDisks2 temperature properties.
const KELVIN_OFFSET: f64 = 273.15;

const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Size in binary units for display, e.g. "1.50 GB". With `add_bytes` the
/// exact byte count follows in parentheses.
pub fn bytes_to_pretty(bytes: &u64, add_bytes: bool) -> String {
    let mut value = *bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let pretty = format!("{:.2} {}", value, UNITS[unit]);
    if add_bytes {
        format!("{} ({} bytes)", pretty, bytes.to_formatted_string(&Locale::en))
    } else {
        pretty
    }
}

/// UDisks2 reports temperatures in Kelvin, with `0` meaning "not known".
pub fn kelvin_to_celsius(kelvin: f64) -> Option<f64> {
    if kelvin <= 0.0 {
        None
    } else {
        Some(kelvin - KELVIN_OFFSET)
    }
}
