use thiserror::Error as ThisError;

/// Why a byte sequence was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Utf8ErrorKind {
    /// A lead byte was expected but `byte` is a continuation byte or has five
    /// or more leading one bits.
    InvalidLeadByte { byte: u8 },
    /// A continuation byte (`10xxxxxx`) was expected.
    InvalidContinuation { byte: u8 },
    /// The input ended `missing` continuation bytes short.
    Truncated { missing: u8 },
    /// The element does not fit in a byte.
    OutOfRange,
}

///
/// Utf8Error
///
/// First failure found while validating, and where it was found. For
/// truncated input the index is that of the unfinished lead byte.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("{} at index {index}", describe(.kind))]
pub struct Utf8Error {
    kind: Utf8ErrorKind,
    index: usize,
}

impl Utf8Error {
    pub(crate) const fn new(kind: Utf8ErrorKind, index: usize) -> Self {
        Self { kind, index }
    }

    #[must_use]
    pub const fn kind(&self) -> Utf8ErrorKind {
        self.kind
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

fn describe(kind: &Utf8ErrorKind) -> String {
    match kind {
        Utf8ErrorKind::InvalidLeadByte { byte } => format!("invalid lead byte {byte:#04x}"),
        Utf8ErrorKind::InvalidContinuation { byte } => {
            format!("invalid continuation byte {byte:#04x}")
        }
        Utf8ErrorKind::Truncated { missing: 1 } => {
            "truncated sequence, 1 continuation byte missing".to_string()
        }
        Utf8ErrorKind::Truncated { missing } => {
            format!("truncated sequence, {missing} continuation bytes missing")
        }
        Utf8ErrorKind::OutOfRange => "value out of byte range".to_string(),
    }
}
