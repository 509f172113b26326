mod entry;
mod ini_file;
mod section;
mod section_id;

pub use entry::IniEntry;
pub use ini_file::IniFile;
pub use section::IniSection;
pub use section_id::SectionId;
