//! Snapshot rendering.
//!
//! The unicode form underlines privileged units with U+0332 (combining low
//! line) after every character, and marks the unit that just moved with a
//! trailing U+030C (combining caron). Units are comma separated in id order.

use std::fmt::Write as _;
use std::io::Write;

use stabring_core::{RingSnapshot, UnitState};

use crate::config::OutputFormat;
use crate::error::Result;

const LOW_LINE: char = '\u{0332}';
const CARON: char = '\u{030C}';

/// Render a snapshot as a single line, without the trailing newline.
pub fn render(snapshot: &RingSnapshot, format: OutputFormat) -> Result<String> {
    let line = match format {
        OutputFormat::Unicode => join(snapshot, unicode_unit),
        OutputFormat::Ascii => join(snapshot, ascii_unit),
        OutputFormat::Json => serde_json::to_string(snapshot)?,
    };
    Ok(line)
}

/// Write one snapshot and flush.
///
/// Text formats leave a blank line between snapshots; JSON is one object per
/// line.
pub fn write_snapshot<W: Write>(
    sink: &mut W,
    snapshot: &RingSnapshot,
    format: OutputFormat,
) -> Result<()> {
    let line = render(snapshot, format)?;
    match format {
        OutputFormat::Json => writeln!(sink, "{line}")?,
        OutputFormat::Unicode | OutputFormat::Ascii => writeln!(sink, "{line}\n")?,
    }
    sink.flush()?;
    Ok(())
}

fn join(snapshot: &RingSnapshot, unit: fn(&UnitState, bool) -> String) -> String {
    snapshot
        .units
        .iter()
        .map(|state| unit(state, snapshot.is_acted(state.id)))
        .collect::<Vec<_>>()
        .join(",")
}

fn unicode_unit(state: &UnitState, acted: bool) -> String {
    let mut out = String::new();
    if state.privileged {
        for c in format!("p{}", state.id).chars() {
            out.push(c);
            out.push(LOW_LINE);
        }
    } else {
        let _ = write!(out, "p{}", state.id);
    }
    if acted {
        out.push(CARON);
    }
    out
}

fn ascii_unit(state: &UnitState, acted: bool) -> String {
    let prefix = if state.privileged { 'P' } else { 'p' };
    let marker = if acted { "^" } else { "" };
    format!("{prefix}{}{marker}", state.id)
}
