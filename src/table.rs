// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Parsing of the saved syscall table. The input is an HTML-style markup
//! table; only `<tr>`/`<td>` structure is interpreted, anything else is
//! treated as text to be stripped. Cell 0 is the syscall number, cell 1 the
//! name, cells 2.. the argument declarations.

use anyhow::{anyhow, bail, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyscallRow {
    pub number: u32,
    pub name: String,
    pub args: Vec<String>,
}

pub fn parse_syscall_table(markup: &str) -> Result<Vec<SyscallRow>> {
    // Tag search happens on an ASCII-lowercased shadow so <TR>/<TD> saved by
    // other tools still match; byte offsets are shared with the original.
    let lower = markup.to_ascii_lowercase();
    let mut rows = Vec::new();
    let mut at = 0;

    while let Some(row_open) = find_from(&lower, "<tr", at) {
        let Some(content_start) = find_from(&lower, ">", row_open) else {
            break;
        };
        let content_start = content_start + 1;
        let content_end = find_from(&lower, "</tr", content_start).unwrap_or(markup.len());

        let cells = row_cells(markup, &lower, content_start, content_end);
        // Rows without a single data cell (header rows use <th>) are dropped
        // and consume no syscall index.
        if !cells.is_empty() {
            rows.push(row_from_cells(cells, rows.len())?);
        }

        at = content_end;
    }

    verify_density(&rows)?;

    Ok(rows)
}

fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack[from..].find(needle).map(|i| from + i)
}

fn row_cells(markup: &str, lower: &str, mut at: usize, row_end: usize) -> Vec<String> {
    let mut cells = Vec::new();

    while let Some(cell_open) = find_from(lower, "<td", at) {
        if cell_open >= row_end {
            break;
        }
        let Some(text_start) = find_from(lower, ">", cell_open) else {
            break;
        };
        let text_start = text_start + 1;
        if text_start > row_end {
            break;
        }
        let text_end = find_from(lower, "</td", text_start).unwrap_or(row_end).min(row_end);

        cells.push(cell_text(&markup[text_start..text_end]));
        at = text_end;
    }

    cells
}

/// Element content with nested tags stripped and common entities decoded.
fn cell_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '<' => {
                // Skip to the end of the tag; an unterminated tag eats the
                // rest of the cell.
                for (_, c) in chars.by_ref() {
                    if c == '>' {
                        break;
                    }
                }
            }
            '&' => match decode_entity(&raw[i..]) {
                Some((decoded, len)) => {
                    text.push(decoded);
                    // The '&' itself is already consumed.
                    for _ in 0..len - 1 {
                        chars.next();
                    }
                }
                None => text.push('&'),
            },
            _ => text.push(c),
        }
    }

    text.trim().to_string()
}

/// Decodes the entity at the start of `s`, returning the replacement and the
/// byte length of the entity text.
fn decode_entity(s: &str) -> Option<(char, usize)> {
    for (entity, decoded) in [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&nbsp;", ' '),
    ] {
        if s.starts_with(entity) {
            return Some((decoded, entity.len()));
        }
    }
    None
}

fn row_from_cells(cells: Vec<String>, position: usize) -> Result<SyscallRow> {
    let number = cells[0]
        .parse()
        .map_err(|_| anyhow!("table row {position}: expected a syscall number, got {:?}", cells[0]))?;
    let name = cells.get(1).cloned().unwrap_or_default();
    let args = cells.get(2..).unwrap_or_default().to_vec();

    Ok(SyscallRow { number, name, args })
}

/// The generated arrays are indexed by syscall number, so the table must
/// declare numbers 0..N in order with no gaps. Tables that skip numbers would
/// silently shift every later entry; refuse them instead.
fn verify_density(rows: &[SyscallRow]) -> Result<()> {
    for (position, row) in rows.iter().enumerate() {
        if row.number != position as u32 {
            bail!(
                "table is not dense: row at position {position} declares syscall number {} ({})",
                row.number,
                row.name
            );
        }
    }
    Ok(())
}
