//! Materializes hierarchical `KEY__SECTION__OPTION` variables into INI files.
//!
//! A variable named `{prefix}{group}__{section}__{key}` sets `key` in `[section]` of
//! `{ini_files_path}/{group}.ini`. Names are matched without regard to case and visited in
//! configuration key order: integers first by value, then everything else ignoring case.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs::{self, File},
    path::{Path, PathBuf},
};

use crate::{IniError, models::IniFile};

/// Separates the levels of a variable name.
pub const KEY_SEPARATOR: &str = "__";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Only variables whose first level starts with this prefix are written.
    pub environment_prefix: String,
    /// Directory the `.ini` files are written to.
    pub ini_files_path: PathBuf,
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), IniError> {
        if self.environment_prefix.trim().is_empty() {
            return Err(IniError::EmptyEnvironmentPrefix);
        }
        Ok(())
    }
}

/// One level of a variable name. Two keys that differ only in case are the same key; the map
/// keeps whichever spelling was inserted first.
#[derive(Debug, Clone)]
struct ConfigKey(String);

impl ConfigKey {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConfigKey {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}

impl Ord for ConfigKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_number = match (self.0.parse::<i32>(), other.0.parse::<i32>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => Ordering::Equal,
        };
        // `01` and `1` sort together but stay distinct keys.
        by_number.then_with(|| cmp_ignore_case(&self.0, &other.0))
    }
}

impl PartialOrd for ConfigKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ConfigKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ConfigKey {}

type SectionOptions = BTreeMap<ConfigKey, Option<String>>;
type FileSections = BTreeMap<ConfigKey, BTreeMap<ConfigKey, SectionOptions>>;

/// Groups variables by their first level (prefix included) and section.
///
/// Every prefixed variable names a file, even without a section below it, and every section
/// level names a section, even without options. A variable nested below the option level marks
/// its option as present without a value; a direct value for the same option takes precedence.
fn group_by_file(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> FileSections {
    let mut files = FileSections::new();

    for (name, value) in vars {
        let segments: Vec<&str> = name.split(KEY_SEPARATOR).collect();

        let Some(group) = segments[0].strip_prefix(prefix) else {
            continue;
        };

        if group.is_empty() {
            log::warn!("Skipping {name}: no file name follows the prefix");
            continue;
        }

        let sections = files.entry(ConfigKey::from(segments[0])).or_default();

        let [_, section, rest @ ..] = segments.as_slice() else {
            continue;
        };

        let options = sections.entry(ConfigKey::from(*section)).or_default();

        let [key, nested @ ..] = rest else {
            log::debug!("{name} has no option below its section");
            continue;
        };

        if nested.is_empty() {
            options.insert(ConfigKey::from(*key), Some(value));
        } else {
            options.entry(ConfigKey::from(*key)).or_insert(None);
        }
    }

    files
}

fn ensure_file_exists(directory: &Path, file_path: &Path) -> Result<(), IniError> {
    if file_path.exists() {
        return Ok(());
    }

    fs::create_dir_all(directory).map_err(|source| IniError::CreateDirectory {
        path: directory.to_path_buf(),
        source,
    })?;

    File::create(file_path).map_err(|source| IniError::Write {
        path: file_path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Writes every prefixed variable into its INI file and returns the written paths in the
/// order they were processed. Existing files are updated, keeping unrelated content.
pub fn generate(
    config: &GeneratorConfig,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Vec<PathBuf>, IniError> {
    config.validate()?;

    let files = group_by_file(&config.environment_prefix, vars);
    let mut written = Vec::with_capacity(files.len());

    for (file_key, sections) in files {
        let group = file_key
            .as_str()
            .strip_prefix(config.environment_prefix.as_str())
            .unwrap_or(file_key.as_str());
        let file_name = format!("{group}.ini");
        let file_path = config.ini_files_path.join(&file_name);

        ensure_file_exists(&config.ini_files_path, &file_path)?;

        log::info!("Processing file {file_name}");

        let mut ini_file = IniFile::create_or_load(&file_path)?;

        for (section, options) in sections {
            let section = section.as_str();
            log::info!("Processing section {section}");

            for (key, value) in options {
                let key = key.as_str();
                log::info!("Setting value {key} to {}", value.as_deref().unwrap_or_default());
                ini_file.set_option(key, value.as_deref(), Some(section));
            }
        }

        ini_file.save_as(&file_path)?;

        log::info!("Ini file was written at {}", file_path.display());

        written.push(file_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn config(dir: &Path) -> GeneratorConfig {
        GeneratorConfig {
            environment_prefix: "INI_".into(),
            ini_files_path: dir.to_path_buf(),
        }
    }

    fn option<'a>(files: &'a FileSections, file: &str, section: &str, key: &str) -> Option<&'a Option<String>> {
        files
            .get(&ConfigKey::from(file))?
            .get(&ConfigKey::from(section))?
            .get(&ConfigKey::from(key))
    }

    fn names<'a>(keys: impl Iterator<Item = &'a ConfigKey>) -> Vec<&'a str> {
        keys.map(ConfigKey::as_str).collect()
    }

    #[test]
    fn groups_by_file_and_section() {
        let files = group_by_file(
            "INI_",
            vars(&[
                ("INI_app__Net__host", "localhost"),
                ("INI_app__Net__port", "8080"),
                ("INI_db__Main__url", "pg://"),
            ]),
        );

        assert_eq!(files.len(), 2);
        assert_eq!(option(&files, "INI_app", "Net", "port").unwrap().as_deref(), Some("8080"));
        assert_eq!(option(&files, "INI_db", "Main", "url").unwrap().as_deref(), Some("pg://"));
    }

    #[test]
    fn names_merge_ignoring_case() {
        let files = group_by_file(
            "INI_",
            vars(&[("INI_app__Net__Port", "1"), ("INI_APP__NET__port", "2")]),
        );

        assert_eq!(names(files.keys()), ["INI_app"]);

        let sections = &files[&ConfigKey::from("INI_app")];
        assert_eq!(names(sections.keys()), ["Net"]);

        let options = &sections[&ConfigKey::from("net")];
        assert_eq!(names(options.keys()), ["Port"]);
        assert_eq!(option(&files, "ini_app", "NET", "PORT").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn integers_sort_first_by_value_then_names_ignoring_case() {
        let mut keys: Vec<ConfigKey> = ["a", "B", "10", "9", "-1"].into_iter().map(ConfigKey::from).collect();
        keys.sort();

        assert_eq!(names(keys.iter()), ["-1", "9", "10", "a", "B"]);
    }

    #[test]
    fn numerically_equal_keys_stay_distinct() {
        assert_ne!(ConfigKey::from("01"), ConfigKey::from("1"));
        assert_eq!(ConfigKey::from("Name"), ConfigKey::from("nAME"));
    }

    #[test]
    fn other_prefixes_are_ignored() {
        let files = group_by_file("INI_", vars(&[("PATH", "/usr/bin"), ("OTHER_app__S__k", "v")]));

        assert!(files.is_empty());
    }

    #[test]
    fn bare_prefix_is_ignored() {
        let files = group_by_file("APP", vars(&[("APP__S__k", "v")]));

        assert!(files.is_empty());
    }

    #[test]
    fn variables_without_option_level_still_name_files() {
        let files = group_by_file("INI_", vars(&[("INI_app", "x"), ("INI_db__Net", "y")]));

        assert_eq!(names(files.keys()), ["INI_app", "INI_db"]);
        assert!(files[&ConfigKey::from("INI_app")].is_empty());
        assert!(files[&ConfigKey::from("INI_db")][&ConfigKey::from("Net")].is_empty());
    }

    #[test]
    fn deeper_nesting_yields_absent_value() {
        let files = group_by_file("INI_", vars(&[("INI_app__Net__proxy__host", "p")]));

        assert_eq!(option(&files, "INI_app", "Net", "proxy"), Some(&None));
    }

    #[test]
    fn direct_value_wins_over_nested_marker() {
        let files = group_by_file(
            "INI_",
            vars(&[("INI_app__Net__proxy", "on"), ("INI_app__Net__proxy__host", "p")]),
        );

        assert_eq!(option(&files, "INI_app", "Net", "proxy").unwrap().as_deref(), Some("on"));
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let config = GeneratorConfig {
            environment_prefix: "  ".into(),
            ini_files_path: PathBuf::from("out"),
        };

        assert!(matches!(generate(&config, vars(&[])), Err(IniError::EmptyEnvironmentPrefix)));
    }

    #[test]
    fn generate_creates_files_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("conf");

        let written = generate(
            &config(&out),
            vars(&[
                ("INI_zeta__S__k", "1"),
                ("INI_alpha__B__y", "2"),
                ("INI_alpha__A__x", "1"),
                ("INI_alpha__A__proxy__host", "p"),
            ]),
        )
        .unwrap();

        assert_eq!(written, vec![out.join("alpha.ini"), out.join("zeta.ini")]);
        assert_eq!(
            fs::read_to_string(out.join("alpha.ini")).unwrap(),
            "[A]\nproxy=\nx=1\n\n[B]\ny=2\n"
        );
        assert_eq!(fs::read_to_string(out.join("zeta.ini")).unwrap(), "[S]\nk=1\n");
    }

    #[test]
    fn generate_appends_sections_in_configuration_key_order() {
        let dir = TempDir::new().unwrap();

        generate(
            &config(dir.path()),
            vars(&[
                ("INI_app__a__k", "1"),
                ("INI_app__B__k", "2"),
                ("INI_app__10__k", "3"),
                ("INI_app__9__k", "4"),
            ]),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("app.ini")).unwrap(),
            "[9]\nk=4\n\n[10]\nk=3\n\n[a]\nk=1\n\n[B]\nk=2\n"
        );
    }

    #[test]
    fn generate_writes_file_for_group_without_options() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        fs::write(&path, "; managed\ntop=1\n").unwrap();

        let written = generate(&config(dir.path()), vars(&[("INI_app", "x"), ("INI_db__Net", "y")])).unwrap();

        assert_eq!(written, vec![path.clone(), dir.path().join("db.ini")]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "top=1\n");
        assert_eq!(fs::read_to_string(dir.path().join("db.ini")).unwrap(), "");
    }

    #[test]
    fn generate_updates_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.ini");
        fs::write(&path, "; managed\ntop=1\n[Net]\nhost=localhost\nport=8080\n").unwrap();

        generate(
            &config(dir.path()),
            vars(&[("INI_app__Net__port", "9090"), ("INI_app__Log__level", "debug")]),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "top=1\n\n[Net]\nhost=localhost\nport=9090\n\n[Log]\nlevel=debug\n"
        );
    }

    #[test]
    fn generate_without_matches_writes_nothing() {
        let dir = TempDir::new().unwrap();

        let written = generate(&config(dir.path()), vars(&[("HOME", "/root")])).unwrap();

        assert!(written.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn generate_stops_at_first_unwritable_file() {
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("app.ini");
        fs::create_dir(&blocked).unwrap();

        let result = generate(
            &config(dir.path()),
            vars(&[("INI_app__S__k", "1"), ("INI_zeta__S__k", "2")]),
        );

        assert!(matches!(result, Err(IniError::Write { path, .. }) if path == blocked));
        assert!(!dir.path().join("zeta.ini").exists());
    }

    #[test]
    fn generate_into_regular_file_fails_to_create_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::write(&out, "").unwrap();

        let result = generate(&config(&out), vars(&[("INI_app__S__k", "1")]));

        assert!(matches!(result, Err(IniError::CreateDirectory { path, .. }) if path == out));
    }
}
