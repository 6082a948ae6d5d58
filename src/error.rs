use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyspaceError {
    // Config
    #[error("alphabet is empty")]
    EmptyAlphabet,

    #[error("duplicate symbol {0:?} in alphabet")]
    DuplicateSymbol(char),

    #[error("invalid thread count: {0}")]
    InvalidThreadCount(usize),

    #[error("unknown alphabet preset: {0}")]
    UnknownPreset(String),

    #[error("search state already holds a match")]
    StateInUse,

    // Arithmetic
    #[error("search space overflows u128 (alphabet size {alphabet_size}, max length {max_length})")]
    Overflow {
        alphabet_size: usize,
        max_length:    usize,
    },

    // Runtime
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeyspaceError {
    /// Whether this error was raised while validating the request,
    /// before any worker was started.
    ///
    /// `Overflow` is also detected up front but is reported separately:
    /// the request is well-formed, it is just too large to count.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyAlphabet
                | Self::DuplicateSymbol(_)
                | Self::InvalidThreadCount(_)
                | Self::UnknownPreset(_)
                | Self::StateInUse
        )
    }
}
