// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use clap::ValueEnum;

use crate::table::SyscallRow;

/// Sentinel for syscalls that take no file descriptor.
pub const NO_FD: i32 = -1;

/// Which argument wins when more than one of them mentions an fd. `Last`
/// matches the tables that have been shipped so far; `first` is arguably what
/// was meant, so it is available for consumers that can re-generate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FdMatch {
    First,
    #[default]
    Last,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedSyscall {
    /// Bit i set when argument slot i is passed by pointer. The two slots
    /// above the last argument are reserved and always zero.
    pub bit_vec: u32,
    /// Argument slot carrying the file descriptor, or NO_FD.
    pub fd_index: i32,
}

pub fn encode(row: &SyscallRow, fd_match: FdMatch) -> EncodedSyscall {
    let mut bit_vec = 0u32;
    let mut fd_index = NO_FD;

    for (slot, arg) in row.args.iter().enumerate() {
        if is_pointer(arg) {
            bit_vec |= 1 << slot;
        }

        if mentions_fd(arg) && (fd_match == FdMatch::Last || fd_index == NO_FD) {
            fd_index = slot as i32;
        }
    }

    EncodedSyscall { bit_vec, fd_index }
}

/// A declared type containing `*` is passed by reference; everything else,
/// empty cells included, is by value.
fn is_pointer(arg: &str) -> bool {
    arg.contains('*')
}

/// An argument is an fd candidate when any of its words contains the literal
/// substring "fd" ("fd", "oldfd", "fd2", "pfds", ...).
fn mentions_fd(arg: &str) -> bool {
    arg.split_whitespace().any(|word| word.contains("fd"))
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(args: &[&str]) -> SyscallRow {
        SyscallRow {
            number: 0,
            name: String::new(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn pointer_classification() {
        assert!(is_pointer("*"));
        assert!(is_pointer("char __user *buf"));
        assert!(is_pointer("struct stat __user * statbuf"));
        assert!(!is_pointer("unsigned int fd"));
        assert!(!is_pointer(""));
    }

    #[test]
    fn middle_pointer_sets_bit_one() {
        // "010" plus the two reserved zeros, read back least significant
        // argument first: 0b00010.
        let encoded = encode(&row(&["int", "char *", "int"]), FdMatch::Last);
        assert_eq!(encoded.bit_vec, 2);
    }

    #[test]
    fn last_argument_owns_its_own_bit() {
        let by_value = encode(&row(&["int", "char *", "int"]), FdMatch::Last);
        let by_pointer = encode(&row(&["int", "char *", "int *"]), FdMatch::Last);
        assert_eq!(by_pointer.bit_vec ^ by_value.bit_vec, 1 << 2);
    }

    #[test]
    fn encoding_is_deterministic() {
        let args = ["unsigned int fd", "char __user *buf", "size_t count"];
        assert_eq!(encode(&row(&args), FdMatch::Last), encode(&row(&args), FdMatch::Last));
    }

    #[test]
    fn read_shaped_row() {
        let encoded = encode(
            &row(&["unsigned int fd", "char __user *buf", "size_t count"]),
            FdMatch::Last,
        );
        assert_eq!(encoded.bit_vec, 0b010);
        assert_eq!(encoded.fd_index, 0);
    }

    #[test]
    fn fd_selection_modes() {
        let args = ["int fd", "void *buf", "int fd2"];
        assert_eq!(encode(&row(&args), FdMatch::Last).fd_index, 2);
        assert_eq!(encode(&row(&args), FdMatch::First).fd_index, 0);
    }

    #[test]
    fn no_fd_argument() {
        assert_eq!(encode(&row(&["const char *path", "int mode"]), FdMatch::Last).fd_index, NO_FD);
        assert_eq!(encode(&row(&[]), FdMatch::Last).fd_index, NO_FD);
    }

    #[test]
    fn fd_matches_inside_words() {
        // "buf" does not mention an fd; "ufds" does.
        assert!(!mentions_fd("void *buf"));
        assert!(mentions_fd("struct pollfd __user *ufds"));
    }

    #[test]
    fn no_arguments_encode_to_zero() {
        let encoded = encode(&row(&[]), FdMatch::Last);
        assert_eq!(encoded.bit_vec, 0);
    }
}
