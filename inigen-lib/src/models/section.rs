use std::fmt::Display;

use crate::models::entry::IniEntry;

/// A named group of entries, kept in insertion order. Duplicate keys are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    pub(crate) name: String,
    pub entries: Vec<IniEntry>,
}

impl IniSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First entry with exactly this key.
    pub fn get_entry_by_key(&self, key: &str) -> Option<&IniEntry> {
        find_entry(&self.entries, key)
    }

    pub fn get_value_by_key(&self, key: &str) -> Option<&str> {
        self.get_entry_by_key(key).and_then(IniEntry::value)
    }
}

/// Renders the header followed by one line per entry.
impl Display for IniSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[{}]", self.name)?;
        for entry in self.entries.iter() {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

pub(crate) fn find_entry<'a>(entries: &'a [IniEntry], key: &str) -> Option<&'a IniEntry> {
    entries.iter().find(|entry| entry.key == key)
}

pub(crate) fn find_entry_mut<'a>(entries: &'a mut [IniEntry], key: &str) -> Option<&'a mut IniEntry> {
    entries.iter_mut().find(|entry| entry.key == key)
}
