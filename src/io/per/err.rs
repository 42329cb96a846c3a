use backtrace::Backtrace;
use std::fmt::{Debug, Display, Formatter};

#[derive(Clone)]
pub struct Error(pub(crate) Box<Inner>);

impl Error {
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.0.kind
    }

    #[cold]
    #[inline(never)]
    pub fn buffer_too_short(needed: usize, available: usize) -> Self {
        Self::from(ErrorKind::BufferTooShort { needed, available })
    }

    #[cold]
    #[inline(never)]
    pub fn incorrect_length(length: u64) -> Self {
        Self::from(ErrorKind::IncorrectLength(length))
    }

    #[cold]
    #[inline(never)]
    pub fn big_length(length: u64, max: u64) -> Self {
        Self::from(ErrorKind::BigLength { length, max })
    }

    #[cold]
    #[inline(never)]
    pub fn incorrect_decode() -> Self {
        Self::from(ErrorKind::IncorrectDecode)
    }

    #[cold]
    #[inline(never)]
    pub fn shift_incorrect(shift: u8) -> Self {
        Self::from(ErrorKind::ShiftIncorrect(shift))
    }

    #[cold]
    #[inline(never)]
    pub fn input_parameters() -> Self {
        Self::from(ErrorKind::InputParameters)
    }

    /// Fails with [`ErrorKind::BufferTooShort`] unless `data` holds at least `needed` bytes
    #[inline]
    pub(crate) fn ensure_available(data: &[u8], needed: usize) -> Result<(), Self> {
        if data.len() < needed {
            Err(Self::buffer_too_short(needed, data.len()))
        } else {
            Ok(())
        }
    }

    /// Fails with [`ErrorKind::ShiftIncorrect`] for a cursor that is not normalized
    #[inline]
    pub(crate) fn ensure_shift(shift: u8) -> Result<(), Self> {
        if shift >= crate::io::per::BYTE_LEN as u8 {
            Err(Self::shift_incorrect(shift))
        } else {
            Ok(())
        }
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Error(Box::new(Inner::from(kind)))
    }
}

impl Debug for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0.kind)?;
        let mut backtrace = self.0.backtrace.clone();
        backtrace.resolve();
        writeln!(f, "{backtrace:?}")
    }
}

impl std::error::Error for Error {
    fn description(&self) -> &str {
        "decoding PER failed"
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Inner {
    pub(crate) kind: ErrorKind,
    pub(crate) backtrace: Backtrace,
}

impl From<ErrorKind> for Inner {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::new_unresolved(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input ends before the field does
    BufferTooShort { needed: usize, available: usize },
    /// A length or fragment multiplier that the encoding does not allow
    IncorrectLength(u64),
    /// A length that is valid on the wire but exceeds what can be represented here
    BigLength { length: u64, max: u64 },
    /// The bits read do not form a valid value for the selected case
    IncorrectDecode,
    /// The cursor shift is not within `0..8`
    ShiftIncorrect(u8),
    /// The static parameters of the decoder are inconsistent
    InputParameters,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::BufferTooShort { needed, available } => {
                write!(
                    f,
                    "Input buffer too short, needed {needed} bytes but only {available} are available"
                )
            }
            ErrorKind::IncorrectLength(length) => {
                write!(f, "Incorrect length {length}")
            }
            ErrorKind::BigLength { length, max } => {
                write!(f, "Length {length} exceeds the supported maximum of {max}")
            }
            ErrorKind::IncorrectDecode => {
                write!(f, "The encoded value is not valid for its decoding case")
            }
            ErrorKind::ShiftIncorrect(shift) => {
                write!(f, "Bit shift {shift} is not within 0..8")
            }
            ErrorKind::InputParameters => {
                write!(f, "Incorrect decoder parameters")
            }
        }
    }
}
