// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Pure text construction of the C fragments that get spliced into the
//! tracker header.

use std::fmt::Display;

pub fn define_dev_count(count: usize) -> String {
    format!("#define DEV_COUNT {count}")
}

/// `{"name",-1}` initializers, one per line, comma-separated with no comma
/// after the final entry. The -1 is the consumer's "not opened yet" fd.
pub fn device_entries(devices: &[String]) -> String {
    devices
        .iter()
        .map(|device| format!("{{\"{device}\",-1}}"))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// A complete single-line declaration, length literal inline:
/// `int name[3] = { 1, 2, 3 };`
pub fn int_array<T: Display>(name: &str, values: &[T]) -> String {
    let joined = values
        .iter()
        .map(T::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("int {name}[{}] = {{ {joined} }};", values.len())
}

#[cfg(test)]
mod test {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn device_block() {
        assert_eq!(
            device_entries(&names(&["kbd0", "mouse0"])),
            "{\"kbd0\",-1},\n{\"mouse0\",-1}"
        );
        assert_eq!(define_dev_count(2), "#define DEV_COUNT 2");
    }

    #[test]
    fn single_device_has_no_comma() {
        assert_eq!(device_entries(&names(&["/dev/urandom"])), "{\"/dev/urandom\",-1}");
    }

    #[test]
    fn empty_device_list() {
        assert_eq!(device_entries(&[]), "");
        assert_eq!(define_dev_count(0), "#define DEV_COUNT 0");
    }

    #[test]
    fn int_array_declaration() {
        assert_eq!(
            int_array("syscall_bit_vec", &[2u32, 0, 6]),
            "int syscall_bit_vec[3] = { 2, 0, 6 };"
        );
        assert_eq!(
            int_array("syscall_fd_index", &[0i32, -1]),
            "int syscall_fd_index[2] = { 0, -1 };"
        );
    }

    #[test]
    fn empty_int_array() {
        assert_eq!(int_array::<i32>("syscall_bit_vec", &[]), "int syscall_bit_vec[0] = {  };");
    }
}
