//! Computer keyboard → synthesizer actions.
//!
//! Two rows of the keyboard form a piano, as in most trackers:
//!
//! ```text
//!    w e   t y u   o p
//!   a s d f g h j k l ;
//!   C D E F G A B C D E
//! ```

use crossterm::event::KeyCode;
use saavy_keys::{NoteId, Waveform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Note(NoteId),
    OctaveDown,
    OctaveUp,
    Waveform(Waveform),
    VolumeDown,
    VolumeUp,
    ToggleReverb,
    ReverbShorter,
    ReverbLonger,
    ToggleEcho,
    EchoShorter,
    EchoLonger,
    StopAll,
    Quit,
}

pub fn action_for(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' => Action::Note(NoteId::C),
            'w' => Action::Note(NoteId::Cs),
            's' => Action::Note(NoteId::D),
            'e' => Action::Note(NoteId::Ds),
            'd' => Action::Note(NoteId::E),
            'f' => Action::Note(NoteId::F),
            't' => Action::Note(NoteId::Fs),
            'g' => Action::Note(NoteId::G),
            'y' => Action::Note(NoteId::Gs),
            'h' => Action::Note(NoteId::A),
            'u' => Action::Note(NoteId::As),
            'j' => Action::Note(NoteId::B),
            'k' => Action::Note(NoteId::C5),
            'o' => Action::Note(NoteId::Cs5),
            'l' => Action::Note(NoteId::D5),
            'p' => Action::Note(NoteId::Ds5),
            ';' => Action::Note(NoteId::E5),

            'z' => Action::OctaveDown,
            'x' => Action::OctaveUp,
            '1' => Action::Waveform(Waveform::Sine),
            '2' => Action::Waveform(Waveform::Square),
            '3' => Action::Waveform(Waveform::Sawtooth),
            '4' => Action::Waveform(Waveform::Triangle),
            '-' => Action::VolumeDown,
            '=' => Action::VolumeUp,
            'r' => Action::ToggleReverb,
            '[' => Action::ReverbShorter,
            ']' => Action::ReverbLonger,
            'c' => Action::ToggleEcho,
            ',' => Action::EchoShorter,
            '.' => Action::EchoLonger,
            ' ' => Action::StopAll,
            'q' => Action::Quit,
            _ => return None,
        },
        KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Key label for a note, for the on-screen keyboard.
pub fn key_for(note: NoteId) -> char {
    match note {
        NoteId::C => 'a',
        NoteId::Cs => 'w',
        NoteId::D => 's',
        NoteId::Ds => 'e',
        NoteId::E => 'd',
        NoteId::F => 'f',
        NoteId::Fs => 't',
        NoteId::G => 'g',
        NoteId::Gs => 'y',
        NoteId::A => 'h',
        NoteId::As => 'u',
        NoteId::B => 'j',
        NoteId::C5 => 'k',
        NoteId::Cs5 => 'o',
        NoteId::D5 => 'l',
        NoteId::Ds5 => 'p',
        NoteId::E5 => ';',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_note_has_a_key_that_maps_back() {
        for note in NoteId::ALL {
            assert_eq!(
                action_for(KeyCode::Char(key_for(note))),
                Some(Action::Note(note))
            );
        }
    }

    #[test]
    fn uppercase_keys_work_too() {
        assert_eq!(action_for(KeyCode::Char('A')), Some(Action::Note(NoteId::C)));
        assert_eq!(action_for(KeyCode::Char('b')), None);
    }
}
