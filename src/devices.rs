// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use log::warn;

// Compile-time limits of the tracker table in the consuming header. Exceeding
// either does not stop generation, but the consumer will not build or will
// truncate, so we complain loudly.
pub const MAX_DEVICES: usize = 100;
pub const MAX_DEV_NAME_LENGTH: usize = 80;

/// Every non-empty line is one device name, in file order. Trailing CRs are
/// dropped so lists saved on other systems keep working.
pub fn parse_device_list(text: &str) -> Vec<String> {
    let devices: Vec<String> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if devices.len() > MAX_DEVICES {
        warn!(
            "{} devices listed, but the tracker table only holds {}",
            devices.len(),
            MAX_DEVICES
        );
    }

    for device in &devices {
        // One byte reserved for the NUL terminator.
        if device.len() >= MAX_DEV_NAME_LENGTH {
            warn!(
                "device name {:?} does not fit in {} bytes",
                device, MAX_DEV_NAME_LENGTH
            );
        }
    }

    devices
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_order_and_skips_blanks() {
        let devices = parse_device_list("/dev/urandom\n\n/dev/ttyS0\n/dev/input/mouse0\n");
        assert_eq!(
            devices,
            vec!["/dev/urandom", "/dev/ttyS0", "/dev/input/mouse0"]
        );
    }

    #[test]
    fn strips_carriage_returns() {
        let devices = parse_device_list("kbd0\r\nmouse0\r\n");
        assert_eq!(devices, vec!["kbd0", "mouse0"]);
    }

    #[test]
    fn empty_input_is_empty_table() {
        assert!(parse_device_list("").is_empty());
        assert!(parse_device_list("\n\n").is_empty());
    }
}
