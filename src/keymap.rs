//! Trigger-key bindings for the keyboard front end.
//!
//! A [`Keymap`] says which computer key plays which note and what the piano
//! key shows as its label. It is configuration owned by the presentation
//! layer; the engine never sees it, it only receives the note names.
//!
//! ```toml
//! [[key]]
//! key = "a"
//! note = "C4"
//! label = "Do"
//!
//! [[key]]
//! key = "w"
//! note = "C#4"
//! ```

use std::{collections::HashSet, path::Path};

use serde::Deserialize;
use tracing::warn;

use crate::{error::ConfigError, notes::NOTES};

/// Label shown on a key that was not given one.
pub const DEFAULT_LABEL: &str = "Play Sound";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyBinding {
    /// Computer key that plays this piano key. Matched exactly.
    pub key: char,
    /// Note name as listed in the note table.
    pub note: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl KeyBinding {
    pub fn new(key: char, note: impl Into<String>) -> Self {
        Self {
            key,
            note: note.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    /// The trigger key as printed on the piano key.
    pub fn hint(&self) -> String {
        self.key.to_uppercase().collect()
    }

    /// Sharps and flats are drawn as black keys.
    pub fn is_black(&self) -> bool {
        crate::notes::is_accidental(&self.note)
    }
}

/// Ordered bindings, left to right as drawn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Keymap {
    #[serde(rename = "key", default)]
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub fn new(bindings: Vec<KeyBinding>) -> Result<Self, ConfigError> {
        let keymap = Self { bindings };
        keymap.validate()?;
        Ok(keymap)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let keymap: Self = toml::from_str(source)?;
        keymap.validate()?;
        Ok(keymap)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Binding for a pressed key. Case-sensitive: 'a' and 'A' differ.
    pub fn binding_for(&self, key: char) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| b.key == key)
    }

    /// Left-to-right index of the key bound to `key`.
    pub fn position(&self, key: char) -> Option<usize> {
        self.bindings.iter().position(|b| b.key == key)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    pub fn get(&self, index: usize) -> Option<&KeyBinding> {
        self.bindings.get(index)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for binding in &self.bindings {
            if !seen.insert(binding.key) {
                return Err(ConfigError::DuplicateKey(binding.key));
            }
            if binding.note.is_empty() {
                return Err(ConfigError::EmptyNote { key: binding.key });
            }
            // Allowed: playing it silences the keyboard
            if !NOTES.contains(&binding.note) {
                warn!(key = %binding.key, note = %binding.note, "note is not in the table");
            }
        }
        Ok(())
    }
}

impl Default for Keymap {
    /// One octave on the home row, sharps on the row above.
    fn default() -> Self {
        const LAYOUT: [(char, &str); 13] = [
            ('a', "C4"),
            ('w', "C#4"),
            ('s', "D4"),
            ('e', "D#4"),
            ('d', "E4"),
            ('f', "F4"),
            ('t', "F#4"),
            ('g', "G4"),
            ('y', "G#4"),
            ('h', "A4"),
            ('u', "A#4"),
            ('j', "B4"),
            ('k', "C5"),
        ];

        Self {
            bindings: LAYOUT
                .iter()
                .map(|&(key, note)| KeyBinding::new(key, note).with_label(note))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_covers_the_octave() {
        let keymap = Keymap::default();
        assert_eq!(keymap.len(), 13);
        assert!(keymap.bindings().iter().all(|b| NOTES.contains(&b.note)));
        assert_eq!(keymap.binding_for('h').map(|b| b.note.as_str()), Some("A4"));
        assert_eq!(keymap.position('k'), Some(12));
    }

    #[test]
    fn black_keys_are_the_accidentals() {
        let keymap = Keymap::default();
        let black: Vec<char> = keymap
            .bindings()
            .iter()
            .filter(|b| b.is_black())
            .map(|b| b.key)
            .collect();
        assert_eq!(black, vec!['w', 'e', 't', 'y', 'u']);
    }

    #[test]
    fn parses_toml() {
        let keymap = Keymap::from_toml_str(
            r#"
            [[key]]
            key = "q"
            note = "Db4"
            label = "Re flat"

            [[key]]
            key = "Q"
            note = "C5"
            "#,
        )
        .unwrap();

        assert_eq!(keymap.len(), 2);
        assert_eq!(keymap.binding_for('q').unwrap().label(), "Re flat");
        assert_eq!(keymap.binding_for('Q').unwrap().label(), DEFAULT_LABEL);
        assert_eq!(keymap.binding_for('q').unwrap().hint(), "Q");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let keymap = Keymap::default();
        assert!(keymap.binding_for('a').is_some());
        assert!(keymap.binding_for('A').is_none());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = Keymap::new(vec![KeyBinding::new('a', "C4"), KeyBinding::new('a', "D4")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateKey('a')));
    }

    #[test]
    fn rejects_empty_notes() {
        let err = Keymap::new(vec![KeyBinding::new('z', "")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyNote { key: 'z' }));
    }

    #[test]
    fn accepts_notes_missing_from_the_table() {
        let keymap = Keymap::new(vec![KeyBinding::new('z', "Z9")]).unwrap();
        assert_eq!(keymap.binding_for('z').unwrap().note, "Z9");
    }

    #[test]
    fn reports_bad_toml() {
        let err = Keymap::from_toml_str("[[key]]\nkey = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Keymap::load("/nonexistent/keymap.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
