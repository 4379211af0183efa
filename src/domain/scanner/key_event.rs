/// A single key event observed on the scanner screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Printable character, as produced by the scanner's keyboard emulation.
    Char(char),
    /// Scanners commonly terminate a scan with Enter.
    Enter,
    /// Modifier/navigation keys and anything else non-printable.
    Other,
}

/// Key event plus where it came from. Events targeted at a designated text
/// input are manual typing, never part of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub from_text_input: bool,
}

impl KeyInput {
    pub fn char(c: char) -> Self {
        Self {
            key: Key::Char(c),
            from_text_input: false,
        }
    }

    pub fn enter() -> Self {
        Self {
            key: Key::Enter,
            from_text_input: false,
        }
    }

    pub fn typed_into_field(key: Key) -> Self {
        Self {
            key,
            from_text_input: true,
        }
    }
}
