mod error;
pub mod stats;
pub mod utf8;

use std::{
    fmt,
    fs::File,
    io::{self, Read, Write},
    path::Path,
};

pub use error::{Utf8Error, Utf8ErrorKind};
pub use stats::{LogStats, SharedLogStats, Snapshot};
pub use utf8::{is_valid_utf8, validate, LeadByte, Utf8Validator};

const CHUNK_SIZE: usize = 64 * 1024;

/// Outcome of checking one input.
#[derive(Debug)]
pub enum Verdict {
    Empty,
    Valid,
    Invalid(Utf8Error),
    Unreadable(io::Error),
}

impl Verdict {
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Empty | Self::Valid)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Valid => f.write_str("valid UTF-8"),
            Self::Invalid(error) => write!(f, "invalid UTF-8 ({error})"),
            Self::Unreadable(error) => write!(f, "{error}"),
        }
    }
}

/// Tally of a [`check_files`] run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub valid: usize,
    pub invalid: usize,
    pub unreadable: usize,
}

impl Summary {
    pub const fn all_valid(&self) -> bool {
        self.invalid == 0 && self.unreadable == 0
    }

    fn add(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Empty | Verdict::Valid => self.valid += 1,
            Verdict::Invalid(_) => self.invalid += 1,
            Verdict::Unreadable(_) => self.unreadable += 1,
        }
    }
}

/// Streams `reader` through a [`Utf8Validator`].
pub fn check_reader<R: Read>(mut reader: R) -> Verdict {
    let mut validator = Utf8Validator::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Verdict::Unreadable(error),
        };
        if let Err(error) = validator.feed(&buffer[..read]) {
            return Verdict::Invalid(error);
        }
    }
    if validator.position() == 0 {
        return Verdict::Empty;
    }
    match validator.finish() {
        Ok(()) => Verdict::Valid,
        Err(error) => Verdict::Invalid(error),
    }
}

pub fn check_path(path: &Path) -> Verdict {
    match File::open(path) {
        Ok(file) => check_reader(file),
        Err(error) => Verdict::Unreadable(error),
    }
}

/// Writes `<path>: <verdict>` to `out` for each path. Per-file failures are
/// reported and counted; only a failed write to `out` is an error.
pub fn check_files<I, P, W>(paths: I, out: &mut W) -> io::Result<Summary>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    W: Write,
{
    let mut summary = Summary::default();
    for path in paths {
        let path = path.as_ref();
        let verdict = check_path(path);
        log::debug!("{}: {verdict:?}", path.display());
        writeln!(out, "{}: {verdict}", path.display())?;
        summary.add(&verdict);
    }
    Ok(summary)
}
