use crate::error::{Utf8Error, Utf8ErrorKind};

/// Shape of a UTF-8 sequence as declared by its first byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeadByte {
    /// `0xxxxxxx`
    Ascii,
    /// `110xxxxx`
    TwoByte,
    /// `1110xxxx`
    ThreeByte,
    /// `11110xxx`
    FourByte,
}

impl LeadByte {
    /// Classifies `byte` by its leading one bits. Continuation bytes and bytes
    /// with five or more leading ones are not lead bytes.
    #[inline]
    pub const fn classify(byte: u8) -> Option<Self> {
        match byte.leading_ones() {
            0 => Some(Self::Ascii),
            2 => Some(Self::TwoByte),
            3 => Some(Self::ThreeByte),
            4 => Some(Self::FourByte),
            _ => None,
        }
    }

    /// Number of continuation bytes that must follow.
    #[inline]
    pub const fn continuations(self) -> u8 {
        match self {
            Self::Ascii => 0,
            Self::TwoByte => 1,
            Self::ThreeByte => 2,
            Self::FourByte => 3,
        }
    }

    pub const fn full_len(self) -> usize {
        self.continuations() as usize + 1
    }
}

/// `10xxxxxx`
#[inline]
pub const fn is_continuation(byte: u8) -> bool {
    byte.leading_ones() == 1
}

///
/// Utf8Validator
///
/// Incremental well-formedness check. The only decoder state is the number
/// of continuation bytes still expected, so input may be fed in chunks split
/// at arbitrary points. The first error poisons the validator.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Utf8Validator {
    expected_continuations: u8,
    lead_index: usize,
    position: usize,
    error: Option<Utf8Error>,
}

impl Utf8Validator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expected_continuations: 0,
            lead_index: 0,
            position: 0,
            error: None,
        }
    }

    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<(), Utf8Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let index = self.position;
        self.position += 1;

        if self.expected_continuations == 0 {
            let Some(lead) = LeadByte::classify(byte) else {
                return Err(self.fail(Utf8ErrorKind::InvalidLeadByte { byte }, index));
            };
            self.expected_continuations = lead.continuations();
            self.lead_index = index;
        } else if is_continuation(byte) {
            self.expected_continuations -= 1;
        } else {
            return Err(self.fail(Utf8ErrorKind::InvalidContinuation { byte }, index));
        }
        Ok(())
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), Utf8Error> {
        bytes.iter().try_for_each(|&byte| self.push(byte))
    }

    /// Checks that the input did not stop inside a sequence.
    pub fn finish(self) -> Result<(), Utf8Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match self.expected_continuations {
            0 => Ok(()),
            missing => {
                let error = Utf8Error::new(Utf8ErrorKind::Truncated { missing }, self.lead_index);
                log::trace!("rejected: {error}");
                Err(error)
            }
        }
    }

    pub const fn expected_continuations(&self) -> u8 {
        self.expected_continuations
    }

    /// Bytes accepted so far, including the one that failed.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// True when the bytes seen so far end on a sequence boundary.
    pub const fn is_boundary(&self) -> bool {
        self.error.is_none() && self.expected_continuations == 0
    }

    pub const fn error(&self) -> Option<Utf8Error> {
        self.error
    }

    fn reject_out_of_range(&mut self) -> Utf8Error {
        if let Some(error) = self.error {
            return error;
        }
        let index = self.position;
        self.position += 1;
        self.fail(Utf8ErrorKind::OutOfRange, index)
    }

    fn fail(&mut self, kind: Utf8ErrorKind, index: usize) -> Utf8Error {
        let error = Utf8Error::new(kind, index);
        log::trace!("rejected: {error}");
        self.error = Some(error);
        error
    }
}

/// Validates a sequence of byte values, reporting the first malformation.
///
/// Elements are any integer type; values that do not fit in a `u8` are
/// rejected where they appear rather than masked.
pub fn validate<I>(sequence: I) -> Result<(), Utf8Error>
where
    I: IntoIterator,
    I::Item: TryInto<u8>,
{
    let mut validator = Utf8Validator::new();
    for value in sequence {
        let byte = value
            .try_into()
            .map_err(|_| validator.reject_out_of_range())?;
        validator.push(byte)?;
    }
    validator.finish()
}

/// Returns `true` if `sequence` is a back-to-back run of well-formed UTF-8
/// sequences with nothing left unfinished at the end.
///
/// ```
/// use utf8check::is_valid_utf8;
///
/// assert!(is_valid_utf8([0xE2, 0x82, 0xAC]));
/// assert!(!is_valid_utf8([0xF0, 0x90, 0x80]));
/// assert!(!is_valid_utf8([229, 65, 127, 256]));
/// ```
#[inline]
pub fn is_valid_utf8<I>(sequence: I) -> bool
where
    I: IntoIterator,
    I::Item: TryInto<u8>,
{
    validate(sequence).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [u8; 0] = [];

    #[test]
    fn empty() {
        assert!(is_valid_utf8(NONE));
        assert!(is_valid_utf8(Vec::<i32>::new()));
    }

    #[test]
    fn ascii() {
        assert!(is_valid_utf8([65]));
        assert!(is_valid_utf8([80, 121, 116, 104, 111, 110, 32, 105, 115, 32, 99]));
        assert!(is_valid_utf8(0u8..=0x7F));
    }

    #[test]
    fn multi_byte() {
        assert!(is_valid_utf8([0xC2, 0x80]));
        assert!(is_valid_utf8([0xE2, 0x82, 0xAC]));
        assert!(is_valid_utf8([0xF0, 0x90, 0x80, 0x80]));
        assert!(is_valid_utf8([0x41, 0xC3, 0xA9, 0xE2, 0x82, 0xAC, 0xF0, 0x9F, 0x98, 0x80]));
    }

    #[test]
    fn truncated() {
        assert!(!is_valid_utf8([0xF0, 0x90, 0x80]));
        assert_eq!(
            validate([0x41, 0xF0, 0x90, 0x80]),
            Err(Utf8Error::new(Utf8ErrorKind::Truncated { missing: 1 }, 1))
        );
        assert_eq!(
            validate([0xE2]),
            Err(Utf8Error::new(Utf8ErrorKind::Truncated { missing: 2 }, 0))
        );
    }

    #[test]
    fn lone_continuation() {
        assert!(!is_valid_utf8([0x80]));
        assert_eq!(
            validate([0x41, 0xBF]),
            Err(Utf8Error::new(Utf8ErrorKind::InvalidLeadByte { byte: 0xBF }, 1))
        );
    }

    #[test]
    fn lead_before_sequence_finished() {
        assert_eq!(
            validate([0xE2, 0x82, 0xC2, 0x80]),
            Err(Utf8Error::new(Utf8ErrorKind::InvalidContinuation { byte: 0xC2 }, 2))
        );
        assert!(!is_valid_utf8([229, 65, 127]));
    }

    #[test]
    fn five_or_more_leading_ones() {
        for byte in 0xF8u8..=0xFF {
            assert_eq!(
                validate([byte]),
                Err(Utf8Error::new(Utf8ErrorKind::InvalidLeadByte { byte }, 0))
            );
        }
    }

    #[test]
    fn bit_patterns_only() {
        // overlong, surrogate and above-U+10FFFF encodings pass the structural check
        assert!(is_valid_utf8([0xC0, 0x80]));
        assert!(is_valid_utf8([0xED, 0xA0, 0x80]));
        assert!(is_valid_utf8([0xF7, 0xBF, 0xBF, 0xBF]));
    }

    #[test]
    fn out_of_range() {
        assert!(!is_valid_utf8([229, 65, 127, 256]));
        assert_eq!(
            validate([0x41, 256, 0x41]),
            Err(Utf8Error::new(Utf8ErrorKind::OutOfRange, 1))
        );
        assert_eq!(
            validate([-1i64]),
            Err(Utf8Error::new(Utf8ErrorKind::OutOfRange, 0))
        );
        // masking would turn 0x141 into 'A'
        assert!(!is_valid_utf8([0x141u16]));
        assert!(is_valid_utf8([0x41u64, 0xC2, 0x80]));
    }

    #[test]
    fn idempotent() {
        let data = vec![0xE2, 0x82, 0xAC, 0x80];
        assert_eq!(is_valid_utf8(data.clone()), is_valid_utf8(data.clone()));
        assert_eq!(validate(data.clone()), validate(data));
    }

    #[test]
    fn classify_lead_bytes() {
        assert_eq!(LeadByte::classify(0x00), Some(LeadByte::Ascii));
        assert_eq!(LeadByte::classify(0x7F), Some(LeadByte::Ascii));
        assert_eq!(LeadByte::classify(0x80), None);
        assert_eq!(LeadByte::classify(0xBF), None);
        assert_eq!(LeadByte::classify(0xC0), Some(LeadByte::TwoByte));
        assert_eq!(LeadByte::classify(0xDF), Some(LeadByte::TwoByte));
        assert_eq!(LeadByte::classify(0xE0), Some(LeadByte::ThreeByte));
        assert_eq!(LeadByte::classify(0xEF), Some(LeadByte::ThreeByte));
        assert_eq!(LeadByte::classify(0xF0), Some(LeadByte::FourByte));
        assert_eq!(LeadByte::classify(0xF7), Some(LeadByte::FourByte));
        assert_eq!(LeadByte::classify(0xF8), None);
        assert_eq!(LeadByte::FourByte.full_len(), 4);
    }

    #[test]
    fn continuation_pattern() {
        assert!((0x80u8..=0xBF).all(is_continuation));
        assert!(!(0x00u8..=0x7F).any(is_continuation));
        assert!(!(0xC0u8..=0xFF).any(is_continuation));
    }

    #[test]
    fn validator_state() {
        let mut validator = Utf8Validator::new();
        assert!(validator.is_boundary());
        validator.push(0xF0).unwrap();
        assert_eq!(validator.expected_continuations(), 3);
        assert!(!validator.is_boundary());
        validator.feed(&[0x9F, 0x98]).unwrap();
        assert_eq!(validator.expected_continuations(), 1);
        validator.push(0x80).unwrap();
        assert!(validator.is_boundary());
        assert_eq!(validator.position(), 4);
        assert_eq!(validator.finish(), Ok(()));
    }

    #[test]
    fn validator_across_chunks() {
        let mut validator = Utf8Validator::new();
        validator.feed(&[0x41, 0xE2]).unwrap();
        validator.feed(&[0x82]).unwrap();
        validator.feed(&[0xAC, 0x42]).unwrap();
        assert_eq!(validator.finish(), Ok(()));
    }

    #[test]
    fn validator_poisoned() {
        let mut validator = Utf8Validator::new();
        let error = validator.feed(&[0x41, 0x80, 0x41]).unwrap_err();
        assert_eq!(error.index(), 1);
        assert_eq!(validator.position(), 2);
        assert_eq!(validator.push(0x41), Err(error));
        assert_eq!(validator.error(), Some(error));
        assert!(!validator.is_boundary());
        assert_eq!(validator.finish(), Err(error));
    }
}
