/*
Note Frequency Table
====================

Maps the note names a key can be bound to onto their pitch in Hz.

Naming Convention:
- Natural notes: C4, D4, E4, etc.
- Sharps: C#4, D#4, etc.
- Flats: Db4, Eb4, etc. (same frequency as the matching sharp)

Lookups are exact: "c4" and "C4 " are not in the table. A name that is not
in the table is not an error, the caller decides what a miss means (the
engine turns it into silence).

Range:
- One octave from middle C (C4, 261.63 Hz) up to C5 (523.25 Hz).
- Values are equal temperament around A4 = 440 Hz, rounded to two decimals.

Example usage:
  NOTES.lookup("A4")   // Some(440.0)
  NOTES.lookup("Db4")  // Some(277.18), same as "C#4"
  NOTES.lookup("Z9")   // None
*/

/// The table every engine uses. Built at compile time, never mutated.
pub static NOTES: NoteTable = NoteTable::standard();

const PIANO_OCTAVE: &[(&str, f32)] = &[
    ("C4", 261.63),
    ("C#4", 277.18),
    ("Db4", 277.18),
    ("D4", 293.66),
    ("D#4", 311.13),
    ("Eb4", 311.13),
    ("E4", 329.63),
    ("F4", 349.23),
    ("F#4", 369.99),
    ("Gb4", 369.99),
    ("G4", 392.00),
    ("G#4", 415.30),
    ("Ab4", 415.30),
    ("A4", 440.00), // A440 tuning reference
    ("A#4", 466.16),
    ("Bb4", 466.16),
    ("B4", 493.88),
    ("C5", 523.25),
];

/// Immutable note name -> frequency (Hz) mapping.
#[derive(Debug, Clone, Copy)]
pub struct NoteTable {
    entries: &'static [(&'static str, f32)],
}

impl NoteTable {
    pub const fn standard() -> Self {
        Self {
            entries: PIANO_OCTAVE,
        }
    }

    /// Frequency for `name`, or `None` if the table has no such note.
    pub fn lookup(&self, name: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|&(_, freq)| freq)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Entries in table order (ascending pitch, sharp before flat).
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NoteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// True for names carrying an accidental ("C#4", "Db4").
///
/// Keyboards draw these as the short black keys.
pub fn is_accidental(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next();
    matches!(chars.next(), Some('#') | Some('b'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a440_reference() {
        assert_eq!(NOTES.lookup("A4"), Some(440.0));
    }

    #[test]
    fn octave_bounds() {
        assert_eq!(NOTES.lookup("C4"), Some(261.63));
        assert_eq!(NOTES.lookup("C5"), Some(523.25));
    }

    #[test]
    fn sharps_and_flats_are_equal() {
        assert_eq!(NOTES.lookup("C#4"), Some(277.18));
        assert_eq!(NOTES.lookup("C#4"), NOTES.lookup("Db4"));
        assert_eq!(NOTES.lookup("D#4"), NOTES.lookup("Eb4"));
        assert_eq!(NOTES.lookup("F#4"), NOTES.lookup("Gb4"));
        assert_eq!(NOTES.lookup("G#4"), NOTES.lookup("Ab4"));
        assert_eq!(NOTES.lookup("A#4"), NOTES.lookup("Bb4"));
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(NOTES.lookup("c4"), None);
        assert_eq!(NOTES.lookup("C4 "), None);
        assert_eq!(NOTES.lookup("C"), None);
        assert_eq!(NOTES.lookup("Z9"), None);
        assert_eq!(NOTES.lookup(""), None);
    }

    #[test]
    fn every_entry_is_a_positive_frequency() {
        assert_eq!(NOTES.len(), 18);
        for (name, freq) in NOTES.iter() {
            assert!(freq.is_finite() && freq > 0.0, "{name} has bad frequency {freq}");
        }
    }

    #[test]
    fn pitch_rises_through_the_octave() {
        let freqs: Vec<f32> = NOTES.iter().map(|(_, f)| f).collect();
        assert!(freqs.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn accidentals() {
        assert!(is_accidental("C#4"));
        assert!(is_accidental("Bb4"));
        assert!(!is_accidental("B4"));
        assert!(!is_accidental("C5"));
        assert!(!is_accidental(""));
    }
}
