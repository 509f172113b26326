mod builders;
pub mod generator;
pub mod models;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use thiserror::Error;

pub use crate::builders::{IniFileBuilder, IniSectionBuilder};
pub use crate::generator::{GeneratorConfig, generate};
use crate::models::{IniEntry, IniFile, SectionId};

pub const ENTRY_KEY_GROUP_NAME: &str = "key";
pub const ENTRY_VALUE_GROUP_NAME: &str = "value";
pub const SECTION_NAME_GROUP_NAME: &str = "section_name";

static SECTION_HEADER_REGEX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*\[(?P<{SECTION_NAME_GROUP_NAME}>.*)\]\s*(?:;.*)?\s*$"))
});

static KEY_VALUE_REGEX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?P<{ENTRY_KEY_GROUP_NAME}>[^=]*)=(?P<{ENTRY_VALUE_GROUP_NAME}>[^;]*)\s*(?:;.*)?\s*$"
    ))
});

#[derive(Error, Debug)]
pub enum IniError {
    #[error("Regex compilation error: {0}")]
    RegexCompilationError(#[from] regex::Error),
    #[error("Regex match, but the given named group {0} was not found: Did the regex capture group name change?")]
    RegexCaptureGroupNotFound(&'static str),
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory { path: PathBuf, source: std::io::Error },
    #[error("Unknown file path format {0}")]
    InvalidPath(PathBuf),
    #[error("The environment prefix must not be empty")]
    EmptyEnvironmentPrefix,
}

fn compiled(pattern: &'static LazyLock<Result<Regex, regex::Error>>) -> Result<&'static Regex, IniError> {
    let pattern: &'static Result<Regex, regex::Error> = pattern;
    pattern.as_ref().map_err(|error| IniError::RegexCompilationError(error.clone()))
}

/// Parses INI text. Comment lines and lines matching neither a section header nor a key/value
/// pair are dropped; duplicate keys are kept as they appear.
pub fn parse(ini_string: &str) -> Result<IniFile, IniError> {
    let section_header_regex = compiled(&SECTION_HEADER_REGEX)?;
    let key_value_regex = compiled(&KEY_VALUE_REGEX)?;

    let mut ini_file = IniFile::new();
    let mut current_section = SectionId::Global;

    // `\r\n`, `\n` and a lone `\r` all end a line. A `\r\n` pair leaves an empty piece behind,
    // which is skipped like any blank line.
    for line in ini_string.split(['\r', '\n']) {
        log::debug!("Parsing line: {line}");

        if line.trim().starts_with(';') {
            log::debug!("Line is a comment.");
            continue;
        }

        if let Some(section_header_captures) = section_header_regex.captures(line) {
            log::debug!("Line matched section start regex");

            let section_name = section_header_captures
                .name(SECTION_NAME_GROUP_NAME)
                .ok_or(IniError::RegexCaptureGroupNotFound(SECTION_NAME_GROUP_NAME))?;

            current_section = SectionId::Named(section_name.as_str().to_owned());
            continue;
        }

        if let Some(key_value_captures) = key_value_regex.captures(line) {
            log::debug!("Line matched key-value regex.");
            ini_file.push_entry(IniEntry::try_from(key_value_captures)?, current_section.name());
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        log::warn!("Skipping unparsable non-empty line: {line}");
    }

    Ok(ini_file)
}

/// Reads and parses `path`. A path that is not an existing file yields an empty document.
///
/// A leading byte order mark is dropped and invalid UTF-8 is replaced with U+FFFD.
pub fn load(path: impl AsRef<Path>) -> Result<IniFile, IniError> {
    let path = path.as_ref();

    if !path.is_file() {
        log::debug!("{} does not exist, starting from an empty document", path.display());
        return Ok(IniFile::new());
    }

    let bytes = fs::read(path).map_err(|source| IniError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let contents = String::from_utf8_lossy(&bytes);
    let text: &str = &contents;

    parse(text.strip_prefix('\u{FEFF}').unwrap_or(text))
}
