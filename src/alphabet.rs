use std::fmt;
use std::str::FromStr;

use crate::error::KeyspaceError;

const DIGITS: &str = "0123456789";
const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LETTERS_DIGITS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ALL_SYMBOLS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789\
                   !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

/// An ordered set of unique symbols that candidates are built from.
///
/// Symbol order is significant: the symbol at position `0` is the "zero
/// digit" of the positional encoding, so index `0` of every search space is
/// the string made of the first symbol only. Two alphabets holding the same
/// symbols in a different order enumerate candidates in a different order.
///
/// An `Alphabet` is never empty and never contains the same symbol twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from the characters of `symbols`, in order.
    ///
    /// # Errors
    ///
    /// [`KeyspaceError::EmptyAlphabet`] if `symbols` is empty,
    /// [`KeyspaceError::DuplicateSymbol`] on the first repeated character.
    pub fn new(symbols: impl AsRef<str>) -> Result<Self, KeyspaceError> {
        let mut out: Vec<char> = Vec::new();
        for c in symbols.as_ref().chars() {
            if out.contains(&c) {
                return Err(KeyspaceError::DuplicateSymbol(c));
            }
            out.push(c);
        }
        if out.is_empty() {
            return Err(KeyspaceError::EmptyAlphabet);
        }
        Ok(Self { symbols: out })
    }

    /// Number of symbols (`A` in the positional encoding).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; present for API symmetry with `len()`.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in encoding order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Position of `c` in the alphabet, if it is a member.
    pub fn position(&self, c: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == c)
    }

    pub fn contains(&self, c: char) -> bool {
        self.position(c).is_some()
    }

    /// Whether every character of `s` belongs to this alphabet.
    pub fn covers(&self, s: &str) -> bool {
        s.chars().all(|c| self.contains(c))
    }
}

impl From<Preset> for Alphabet {
    fn from(preset: Preset) -> Self {
        // Preset tables are non-empty and duplicate-free.
        Self {
            symbols: preset.symbols().chars().collect(),
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Preset
// ---------------------------------------------------------------------------

/// The four named alphabets offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// `0-9`.
    Digits,

    /// `a-z` followed by `A-Z`.
    Letters,

    /// Letters followed by digits.
    LettersDigits,

    /// Letters, digits, then ASCII punctuation.
    All,
}

impl Preset {
    /// Every preset, in menu order.
    pub const ALL: [Preset; 4] = [
        Preset::Digits,
        Preset::Letters,
        Preset::LettersDigits,
        Preset::All,
    ];

    pub fn symbols(self) -> &'static str {
        match self {
            Self::Digits        => DIGITS,
            Self::Letters       => LETTERS,
            Self::LettersDigits => LETTERS_DIGITS,
            Self::All           => ALL_SYMBOLS,
        }
    }

    /// Short name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Digits        => "digits",
            Self::Letters       => "letters",
            Self::LettersDigits => "alnum",
            Self::All           => "all",
        }
    }

    /// Resolve a menu choice: `"1"`-`"4"` or a preset name.
    pub fn from_choice(choice: &str) -> Result<Self, KeyspaceError> {
        match choice.trim() {
            "1" => Ok(Self::Digits),
            "2" => Ok(Self::Letters),
            "3" => Ok(Self::LettersDigits),
            "4" => Ok(Self::All),
            other => other.parse(),
        }
    }
}

impl FromStr for Preset {
    type Err = KeyspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| KeyspaceError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
