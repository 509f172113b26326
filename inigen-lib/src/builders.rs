use crate::models::{IniEntry, IniFile, IniSection};

#[derive(Debug)]
pub struct IniSectionBuilder {
    section: IniSection,
}

impl IniSectionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            section: IniSection::new(name),
        }
    }

    pub fn add_entry(mut self, entry: IniEntry) -> Self {
        self.section.entries.push(entry);
        self
    }

    pub fn add_key_value_pair(self, key: &str, value: &str) -> Self {
        self.add_entry(IniEntry::new(key, Some(value)))
    }

    pub fn build(self) -> IniSection {
        self.section
    }
}

#[derive(Debug, Default)]
pub struct IniFileBuilder {
    ini_file: IniFile,
}

impl IniFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_global_entry(mut self, entry: IniEntry) -> Self {
        self.ini_file.global_entries.push(entry);
        self
    }

    pub fn add_global_key_value_pair(self, key: &str, value: &str) -> Self {
        self.add_global_entry(IniEntry::new(key, Some(value)))
    }

    /// Appends `section`. Its entries are merged into an existing section of the same name, so
    /// section names stay unique.
    pub fn add_section(mut self, section: IniSection) -> Self {
        match self.ini_file.sections.iter_mut().find(|existing| existing.name == section.name) {
            Some(existing) => existing.entries.extend(section.entries),
            None => self.ini_file.sections.push(section),
        }
        self
    }

    pub fn build(self) -> IniFile {
        self.ini_file
    }
}
