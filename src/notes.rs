/*
Note Identifiers and the Frequency Table
========================================

The keyboard exposes a fixed set of 17 keys: the twelve pitch classes of the
reference octave plus the first five keys of the octave above.

    C  C#  D  D#  E  F  F#  G  G#  A  A#  B  C5  C#5  D5  D#5  E5

Every key maps to a base frequency at the reference octave (4). Playing the
keyboard in another octave scales that base by a power of two:

    frequency(note, octave) = base(note) × 2^(octave − 4)

The keys above B carry their own base (C5 = 523.25 Hz), so "C5 at octave 4"
is one octave above "C at octave 4", and both move together when the octave
changes.

Naming Convention:
- Sharps are spelled with '#': "C#", "F#5"
- Flats are accepted as enharmonic aliases when parsing: "Db" == "C#"
- The reference octave may be spelled explicitly: "A4" == "A"

Scaling by a power of two only touches the exponent of an f32, so doubling
the octave doubles the frequency exactly, with no rounding.
*/

use std::fmt;
use std::str::FromStr;

use crate::error::SynthError;

/// Octave at which `NoteId::base_frequency` is defined.
pub const REFERENCE_OCTAVE: i32 = 4;
/// Lowest octave accepted; lower requests are clamped here.
pub const MIN_OCTAVE: i32 = 0;
/// Highest octave accepted; higher requests are clamped here.
pub const MAX_OCTAVE: i32 = 8;

/// One key of the keyboard.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoteId {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
    C5,
    Cs5,
    D5,
    Ds5,
    E5,
}

impl NoteId {
    pub const COUNT: usize = 17;

    /// Every note, in keyboard order. `ALL[n.index()] == n`.
    pub const ALL: [NoteId; NoteId::COUNT] = [
        NoteId::C,
        NoteId::Cs,
        NoteId::D,
        NoteId::Ds,
        NoteId::E,
        NoteId::F,
        NoteId::Fs,
        NoteId::G,
        NoteId::Gs,
        NoteId::A,
        NoteId::As,
        NoteId::B,
        NoteId::C5,
        NoteId::Cs5,
        NoteId::D5,
        NoteId::Ds5,
        NoteId::E5,
    ];

    /// Stable slot index, used to key per-note arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Frequency in Hz at the reference octave.
    pub fn base_frequency(self) -> f32 {
        match self {
            NoteId::C => 261.63,
            NoteId::Cs => 277.18,
            NoteId::D => 293.66,
            NoteId::Ds => 311.13,
            NoteId::E => 329.63,
            NoteId::F => 349.23,
            NoteId::Fs => 369.99,
            NoteId::G => 392.00,
            NoteId::Gs => 415.30,
            NoteId::A => 440.00,
            NoteId::As => 466.16,
            NoteId::B => 493.88,
            NoteId::C5 => 523.25,
            NoteId::Cs5 => 554.37,
            NoteId::D5 => 587.33,
            NoteId::Ds5 => 622.25,
            NoteId::E5 => 659.25,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NoteId::C => "C",
            NoteId::Cs => "C#",
            NoteId::D => "D",
            NoteId::Ds => "D#",
            NoteId::E => "E",
            NoteId::F => "F",
            NoteId::Fs => "F#",
            NoteId::G => "G",
            NoteId::Gs => "G#",
            NoteId::A => "A",
            NoteId::As => "A#",
            NoteId::B => "B",
            NoteId::C5 => "C5",
            NoteId::Cs5 => "C#5",
            NoteId::D5 => "D5",
            NoteId::Ds5 => "D#5",
            NoteId::E5 => "E5",
        }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoteId {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let note = match s {
            "C" | "C4" => NoteId::C,
            "C#" | "C#4" | "Db" | "Db4" => NoteId::Cs,
            "D" | "D4" => NoteId::D,
            "D#" | "D#4" | "Eb" | "Eb4" => NoteId::Ds,
            "E" | "E4" => NoteId::E,
            "F" | "F4" => NoteId::F,
            "F#" | "F#4" | "Gb" | "Gb4" => NoteId::Fs,
            "G" | "G4" => NoteId::G,
            "G#" | "G#4" | "Ab" | "Ab4" => NoteId::Gs,
            "A" | "A4" => NoteId::A,
            "A#" | "A#4" | "Bb" | "Bb4" => NoteId::As,
            "B" | "B4" => NoteId::B,
            "C5" => NoteId::C5,
            "C#5" | "Db5" => NoteId::Cs5,
            "D5" => NoteId::D5,
            "D#5" | "Eb5" => NoteId::Ds5,
            "E5" => NoteId::E5,
            other => return Err(SynthError::UnknownNote(other.to_string())),
        };
        Ok(note)
    }
}

/// Clamp an octave request into `[MIN_OCTAVE, MAX_OCTAVE]`.
#[inline]
pub fn clamp_octave(octave: i32) -> i32 {
    octave.clamp(MIN_OCTAVE, MAX_OCTAVE)
}

/// Frequency in Hz of `note` played in `octave` (clamped to the valid range).
pub fn frequency(note: NoteId, octave: i32) -> f32 {
    let shift = clamp_octave(octave) - REFERENCE_OCTAVE;
    let base = note.base_frequency();

    // Powers of two are exact in f32: this only moves the exponent.
    if shift >= 0 {
        base * (1u32 << shift) as f32
    } else {
        base / (1u32 << -shift) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_up_doubles_exactly() {
        for note in NoteId::ALL {
            for octave in MIN_OCTAVE..MAX_OCTAVE {
                assert_eq!(
                    frequency(note, octave + 1),
                    2.0 * frequency(note, octave),
                    "{note} at octave {octave}"
                );
            }
        }
    }

    #[test]
    fn reference_octave_returns_base() {
        assert_eq!(frequency(NoteId::A, 4), 440.0);
        assert_eq!(frequency(NoteId::C, 4), 261.63);
        assert_eq!(frequency(NoteId::A, 3), 220.0);
    }

    #[test]
    fn absurd_octaves_are_clamped() {
        assert_eq!(frequency(NoteId::A, -3), frequency(NoteId::A, MIN_OCTAVE));
        assert_eq!(frequency(NoteId::A, 99), frequency(NoteId::A, MAX_OCTAVE));
        assert!(frequency(NoteId::C, i32::MIN) > 0.0);
    }

    #[test]
    fn index_matches_all_order() {
        for (i, note) in NoteId::ALL.iter().enumerate() {
            assert_eq!(note.index(), i);
        }
    }

    #[test]
    fn parses_names_and_flat_aliases() {
        for note in NoteId::ALL {
            assert_eq!(note.name().parse::<NoteId>(), Ok(note));
        }
        assert_eq!("Db".parse::<NoteId>(), Ok(NoteId::Cs));
        assert_eq!("Eb5".parse::<NoteId>(), Ok(NoteId::Ds5));
        assert_eq!("A4".parse::<NoteId>(), Ok(NoteId::A));
    }

    #[test]
    fn unknown_names_fail_fast() {
        assert_eq!(
            "H".parse::<NoteId>(),
            Err(SynthError::UnknownNote("H".to_string()))
        );
        assert!("F5".parse::<NoteId>().is_err());
        assert!("".parse::<NoteId>().is_err());
    }
}
