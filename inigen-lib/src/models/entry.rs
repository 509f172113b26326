use std::fmt::Display;

use regex::Captures;

use crate::{ENTRY_KEY_GROUP_NAME, ENTRY_VALUE_GROUP_NAME, IniError};

/// A single `key=value` line.
///
/// An absent value and an empty value both render as `key=`. Parsing always yields a present
/// value, so an absent value becomes `Some("")` after one save/load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniEntry {
    pub key: String,
    pub value: Option<String>,
}

impl IniEntry {
    pub fn new(key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Self {
            key: key.into(),
            value: value.map(Into::into),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Display for IniEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value.as_deref().unwrap_or_default())
    }
}

impl TryFrom<Captures<'_>> for IniEntry {
    type Error = IniError;

    fn try_from(captures: Captures<'_>) -> Result<Self, Self::Error> {
        let key = captures
            .name(ENTRY_KEY_GROUP_NAME)
            .ok_or(IniError::RegexCaptureGroupNotFound(ENTRY_KEY_GROUP_NAME))?
            .as_str();

        let value = captures
            .name(ENTRY_VALUE_GROUP_NAME)
            .ok_or(IniError::RegexCaptureGroupNotFound(ENTRY_VALUE_GROUP_NAME))?
            .as_str();

        Ok(Self {
            key: key.to_owned(),
            value: Some(value.to_owned()),
        })
    }
}
