use std::{
    fmt::{Display, Write},
    fs,
    path::Path,
};

use crate::{
    IniError,
    models::{
        IniEntry,
        section::{IniSection, find_entry, find_entry_mut},
    },
};

/// An INI document: sectionless entries followed by named sections, both in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IniFile {
    pub(crate) global_entries: Vec<IniEntry>,
    pub(crate) sections: Vec<IniSection>,
}

impl IniFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the file at `path`, or returns an empty document when no such file exists.
    /// Nothing is created on disk.
    pub fn create_or_load(path: impl AsRef<Path>) -> Result<Self, IniError> {
        crate::load(path)
    }

    pub fn global_entries(&self) -> &[IniEntry] {
        &self.global_entries
    }

    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    pub fn get_global_value_by_key(&self, key: &str) -> Option<&str> {
        find_entry(&self.global_entries, key).and_then(IniEntry::value)
    }

    pub fn get_section_by_name(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    fn get_section_by_name_mut(&mut self, name: &str) -> Option<&mut IniSection> {
        self.sections.iter_mut().find(|section| section.name == name)
    }

    /// Overwrites the value of the first entry matching `key` in `section` (or the top level),
    /// appending a new entry, and the section itself if needed, when there is none.
    pub fn set_option(&mut self, key: &str, value: Option<&str>, section: Option<&str>) {
        let existing = match section {
            None => find_entry_mut(&mut self.global_entries, key),
            Some(name) => self
                .get_section_by_name_mut(name)
                .and_then(|section| find_entry_mut(&mut section.entries, key)),
        };

        match existing {
            Some(entry) => entry.value = value.map(str::to_owned),
            None => self.add_option(key, value, section),
        }
    }

    /// Appends a new entry without looking for an existing one. A missing section is created
    /// at the end of the document.
    pub fn add_option(&mut self, key: &str, value: Option<&str>, section: Option<&str>) {
        self.push_entry(IniEntry::new(key, value), section);
    }

    pub(crate) fn push_entry(&mut self, entry: IniEntry, section: Option<&str>) {
        let Some(name) = section else {
            self.global_entries.push(entry);
            return;
        };

        match self.get_section_by_name_mut(name) {
            Some(section) => section.entries.push(entry),
            None => {
                log::debug!("Creating section [{name}]");
                let mut section = IniSection::new(name);
                section.entries.push(entry);
                self.sections.push(section);
            }
        }
    }

    /// Writes the serialized document to `path`, replacing any previous content and creating
    /// missing parent directories.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<(), IniError> {
        let path = path.as_ref();
        let parent = path.parent().ok_or_else(|| IniError::InvalidPath(path.to_path_buf()))?;

        fs::create_dir_all(parent).map_err(|source| IniError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;

        fs::write(path, self.to_string()).map_err(|source| IniError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Wrote {} section(s) to {}", self.sections.len(), path.display());

        Ok(())
    }
}

impl Display for IniFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = String::new();

        for entry in self.global_entries.iter() {
            writeln!(output, "{entry}")?;
        }

        for section in self.sections.iter() {
            // Blank separator only once something visible has been written.
            if !output.trim().is_empty() {
                output.push('\n');
            }
            write!(output, "{section}")?;
        }

        f.write_str(&output)
    }
}
