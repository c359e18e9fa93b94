// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! grafter regenerates the generated regions of the guest fd-tracker header:
//! the device table the preload library matches open() paths against, and the
//! per-syscall tables telling the host which arguments are pointers and which
//! one is the fd.

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};

use crate::{
    encode::FdMatch,
    splice::{Edit, Markers},
};

mod devices;
mod emit;
mod encode;
mod splice;
mod table;

const DEVICE_MARKERS: Markers = Markers {
    count: Some("//grafter:dev_count"),
    begin: "//grafter:devices_begin",
    end: "//grafter:devices_end",
};

const SYSCALL_MARKERS: Markers = Markers {
    count: None,
    begin: "//grafter:syscalls_begin",
    end: "//grafter:syscalls_end",
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Device list, one name per line
    #[arg(long, default_value = "device_list.txt")]
    devices: PathBuf,

    /// Saved markup of the syscall table
    #[arg(long, default_value = "syscall_table.html")]
    table: PathBuf,

    /// Header to rewrite in place
    #[arg(long, default_value = "devfile_guest_fd_tracker.h")]
    header: PathBuf,

    /// Which argument to pick when several of them mention an fd
    #[arg(long, value_enum, default_value_t = FdMatch::default())]
    fd_match: FdMatch,

    #[command(subcommand)]
    target: Option<Target>,
}

#[derive(Subcommand, Clone, Copy, Debug)]
enum Target {
    /// Regenerate only the device table
    Devices,
    /// Regenerate only the syscall tables
    Syscalls,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let (do_devices, do_syscalls) = match args.target {
        None => (true, true),
        Some(Target::Devices) => (true, false),
        Some(Target::Syscalls) => (false, true),
    };

    let mut edits = Vec::new();
    if do_devices {
        edits.push(device_edit(&args)?);
    }
    if do_syscalls {
        edits.push(syscall_edit(&args)?);
    }

    splice::patch_file(&args.header, &edits)?;
    info!("patched {}", args.header.display());

    Ok(())
}

fn device_edit(args: &Args) -> Result<Edit> {
    let text = fs::read_to_string(&args.devices)
        .map_err(|e| anyhow!("failed to read device list {}: {e}", args.devices.display()))?;
    let devices = devices::parse_device_list(&text);
    debug!("{} devices in {}", devices.len(), args.devices.display());

    Ok(Edit {
        markers: DEVICE_MARKERS,
        count_line: Some(emit::define_dev_count(devices.len())),
        body: emit::device_entries(&devices),
    })
}

fn syscall_edit(args: &Args) -> Result<Edit> {
    let markup = fs::read_to_string(&args.table)
        .map_err(|e| anyhow!("failed to read syscall table {}: {e}", args.table.display()))?;
    let rows = table::parse_syscall_table(&markup)?;
    debug!("{} syscalls in {}", rows.len(), args.table.display());

    let encoded: Vec<_> = rows.iter().map(|row| encode::encode(row, args.fd_match)).collect();
    let bit_vecs: Vec<u32> = encoded.iter().map(|e| e.bit_vec).collect();
    let fd_indices: Vec<i32> = encoded.iter().map(|e| e.fd_index).collect();

    Ok(Edit {
        markers: SYSCALL_MARKERS,
        count_line: None,
        body: format!(
            "{}\n{}",
            emit::int_array("syscall_bit_vec", &bit_vecs),
            emit::int_array("syscall_fd_index", &fd_indices)
        ),
    })
}
