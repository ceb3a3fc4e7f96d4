use std::collections::BTreeMap;

use serde::Serialize;

pub const DEBUGGER_STACK: &str = "DebuggerStack";
pub const DEBUGGER_STATUS: &str = "DebuggerStatus";
pub const DEBUGGER_WATCH: &str = "DebuggerWatch";
pub const DEBUGGER_TRACE: &str = "DebuggerTrace";

/// Buffers that exist whenever the debugger UI is open.
pub const GUI_BUFFERS: [&str; 3] = [DEBUGGER_STACK, DEBUGGER_STATUS, DEBUGGER_WATCH];

/// Buffer numbers mapped to buffer names, as listed by the editor.
///
/// A later entry for the same number replaces the earlier one. Names are not
/// required to be unique; [`id_of`](Self::id_of) resolves a repeated name to
/// the highest buffer number carrying it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BufferDirectory {
    entries: BTreeMap<u32, String>,
}

impl BufferDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, name: impl Into<String>) {
        self.entries.insert(id, name.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .rev()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.values().any(|n| n == name)
    }

    pub fn contains_all(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.contains_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

impl FromIterator<(u32, String)> for BufferDirectory {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(u32, &'a str)> for BufferDirectory {
    fn from_iter<I: IntoIterator<Item = (u32, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect()
    }
}

/// Parses the output of the editor's `:buffers` command.
///
/// Lines that do not describe a buffer are skipped.
pub fn parse_buffer_listing(listing: &str) -> BufferDirectory {
    listing.split('\n').filter_map(parse_buffer_line).collect()
}

/// Reads one `:buffers` row: optional whitespace, the buffer number, then any
/// text containing a double-quoted name.
///
/// The name is taken from the right-most pair of adjacent quotes that encloses
/// at least one character, so flags and trailing `line N` columns never leak
/// into it.
pub fn parse_buffer_line(line: &str) -> Option<(u32, String)> {
    let line = line.trim_start();
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }

    let id = line[..digits].parse::<u32>().ok()?;
    let rest = &line[digits..];

    let quotes: Vec<usize> = rest.match_indices('"').map(|(i, _)| i).collect();
    let name = quotes
        .windows(2)
        .rev()
        .find(|pair| pair[1] > pair[0] + 1)
        .map(|pair| &rest[pair[0] + 1..pair[1]])?;

    Some((id, name.to_string()))
}
