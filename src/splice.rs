// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Marker-based splicing of generated fragments into the hand-maintained
//! header. Markers are literal line substrings owned by this tool; the header
//! keeps them across runs, we only ever rewrite what sits between them.
//!
//! Every region is resolved and validated against the pristine file before a
//! single line is touched, and the result is written out through a temporary
//! file in the same directory, so a failing run leaves the header exactly as
//! it found it.

use std::{fs, path::Path};

use anyhow::{anyhow, bail, Result};
use log::debug;

#[derive(Clone, Copy, Debug)]
pub struct Markers {
    /// Marker whose following line holds the record-count `#define`. Count
    /// and region can live apart, but count must come first.
    pub count: Option<&'static str>,
    pub begin: &'static str,
    pub end: &'static str,
}

/// One generated fragment and where it goes.
#[derive(Clone, Debug)]
pub struct Edit {
    pub markers: Markers,
    /// Replacement for the line after the count marker, when there is one.
    pub count_line: Option<String>,
    /// Replaces every line strictly between the begin and end markers.
    pub body: String,
}

struct Region {
    count: Option<usize>,
    begin: usize,
    end: usize,
}

pub fn patch_file(path: &Path, edits: &[Edit]) -> Result<()> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;

    let patched = apply_edits(&text, edits)?;

    write_atomic(path, &patched)
}

pub fn apply_edits(text: &str, edits: &[Edit]) -> Result<String> {
    let mut lines: Vec<String> = text.lines().map(String::from).collect();

    // Resolve everything up front; a missing or misplaced marker must not
    // leave a partially edited file behind.
    for edit in edits {
        locate(&lines, &edit.markers)?;
    }

    for edit in edits {
        // Re-resolved per edit, since earlier edits shift line numbers.
        let region = locate(&lines, &edit.markers)?;
        apply(&mut lines, &region, edit);
    }

    let mut patched = lines.join("\n");
    if text.ends_with('\n') {
        patched.push('\n');
    }
    Ok(patched)
}

fn locate(lines: &[String], markers: &Markers) -> Result<Region> {
    let begin = position(lines, markers.begin)?;
    let end = position(lines, markers.end)?;
    if end <= begin {
        bail!("marker {:?} must come after {:?}", markers.end, markers.begin);
    }

    let count = match markers.count {
        Some(marker) => {
            let count = position(lines, marker)?;
            // The line after the count marker is the rewrite slot, so the
            // region has to start further down.
            if count + 1 >= begin {
                bail!("marker {marker:?} must come before {:?}", markers.begin);
            }
            Some(count)
        }
        None => None,
    };

    Ok(Region { count, begin, end })
}

fn position(lines: &[String], marker: &str) -> Result<usize> {
    let mut hits = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(marker))
        .map(|(index, _)| index);

    let position = hits
        .next()
        .ok_or_else(|| anyhow!("marker {marker:?} not found"))?;
    if hits.next().is_some() {
        bail!("marker {marker:?} appears more than once");
    }

    Ok(position)
}

fn apply(lines: &mut Vec<String>, region: &Region, edit: &Edit) {
    if let (Some(count), Some(count_line)) = (region.count, &edit.count_line) {
        lines[count + 1] = count_line.clone();
    }

    debug!(
        "replacing {} line(s) after marker {:?} with {} line(s)",
        region.end - region.begin - 1,
        edit.markers.begin,
        edit.body.lines().count()
    );

    let _ = lines.splice(region.begin + 1..region.end, edit.body.lines().map(String::from));
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    fs::write(&tmp, contents)
        .map_err(|e| anyhow!("failed to write {}: {e}", tmp.to_string_lossy()))?;
    fs::rename(&tmp, path)
        .map_err(|e| anyhow!("failed to move {} into place: {e}", tmp.to_string_lossy()))?;

    Ok(())
}
