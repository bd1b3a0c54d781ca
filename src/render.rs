//! Mapping a [`LimitStatus`] onto a display surface.
//!
//! [`render_instructions`] is pure; surfaces only receive the resulting text.

use crate::types::LimitStatus;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Text written for a field the exporter did not send.
pub const ABSENT_TEXT: &str = "";

/// The four addressable locations on a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Limit,
    Remaining,
    CheckedAt,
    Address,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Limit,
        Location::Remaining,
        Location::CheckedAt,
        Location::Address,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Location::Limit => "limit",
            Location::Remaining => "remaining",
            Location::CheckedAt => "checked_at",
            Location::Address => "address",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstruction {
    pub location: Location,
    pub text: String,
}

fn text_of<T: ToString>(v: Option<&T>) -> String {
    v.map(ToString::to_string)
        .unwrap_or_else(|| ABSENT_TEXT.to_string())
}

pub fn render_instructions(status: &LimitStatus) -> [RenderInstruction; 4] {
    Location::ALL.map(|location| {
        let text = match location {
            Location::Limit => text_of(status.pull_limit.as_ref()),
            Location::Remaining => text_of(status.pull_remaining.as_ref()),
            Location::CheckedAt => text_of(status.checked_at.as_ref()),
            Location::Address => text_of(status.ip_address.as_ref()),
        };
        RenderInstruction { location, text }
    })
}

/// Somewhere a snapshot can be shown.
///
/// `set_text` is called once per location, then `commit` once. Text set before
/// a failed commit may stay staged; the next full set of four replaces it.
pub trait DisplaySurface {
    fn set_text(&mut self, location: Location, text: &str);

    fn commit(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn set_text(&mut self, location: Location, text: &str) {
        (**self).set_text(location, text)
    }

    fn commit(&mut self) -> io::Result<()> {
        (**self).commit()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    cells: BTreeMap<Location, String>,
    commits: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, location: Location) -> Option<&str> {
        self.cells.get(&location).map(String::as_str)
    }

    /// Lookup by element id, e.g. `"remaining"`.
    pub fn get_by_id(&self, id: &str) -> Option<&str> {
        Location::ALL
            .into_iter()
            .find(|l| l.id() == id)
            .and_then(|l| self.get(l))
    }

    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl DisplaySurface for MemorySurface {
    fn set_text(&mut self, location: Location, text: &str) {
        self.cells.insert(location, text.to_string());
    }

    fn commit(&mut self) -> io::Result<()> {
        self.commits += 1;
        Ok(())
    }
}

/// Writes `id: text` lines to a writer on every commit.
pub struct TerminalSurface<W: Write> {
    out: W,
    pending: MemorySurface,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: MemorySurface::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn set_text(&mut self, location: Location, text: &str) {
        self.pending.set_text(location, text);
    }

    fn commit(&mut self) -> io::Result<()> {
        let mut block = String::new();
        for location in Location::ALL {
            let text = self.pending.get(location).unwrap_or(ABSENT_TEXT);
            block.push_str(&format!("{}: {}\n", location.id(), text));
        }
        // Single write per snapshot.
        self.out.write_all(block.as_bytes())?;
        self.out.flush()
    }
}
