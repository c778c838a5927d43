//! Python-style open mode strings (`"r"`, `"wb"`, `"a+"`, ...)

use std::fmt;
use std::str::FromStr;

use crate::error::FsError;

const VALID_CHARS: &str = "rwxtab+";

/// Parsed open mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    raw: String,
}

impl Mode {
    /// Parse and validate a mode string
    pub fn new(mode: &str) -> Result<Self, FsError> {
        if mode.is_empty() {
            return Err(FsError::InvalidMode("mode must not be empty".into()));
        }
        if let Some(c) = mode.chars().find(|c| !VALID_CHARS.contains(*c)) {
            return Err(FsError::InvalidMode(format!(
                "mode '{mode}' contains invalid character '{c}'"
            )));
        }
        if !mode.starts_with(['r', 'w', 'x', 'a']) {
            return Err(FsError::InvalidMode(format!(
                "mode '{mode}' must start with 'r', 'w', 'x' or 'a'"
            )));
        }
        if mode.contains('t') && mode.contains('b') {
            return Err(FsError::InvalidMode(format!(
                "mode '{mode}' can't be binary ('b') and text ('t')"
            )));
        }
        Ok(Self {
            raw: mode.to_string(),
        })
    }

    /// Parse a mode for binary-only opening (no `t`)
    pub fn binary(mode: &str) -> Result<Self, FsError> {
        let parsed = Self::new(mode)?;
        if parsed.raw.contains('t') {
            return Err(FsError::InvalidMode(format!(
                "mode '{mode}' must be binary"
            )));
        }
        Ok(parsed)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn has(&self, c: char) -> bool {
        self.raw.contains(c)
    }

    pub fn reading(&self) -> bool {
        self.has('r') || self.has('+')
    }

    pub fn writing(&self) -> bool {
        self.has('w') || self.has('a') || self.has('x') || self.has('+')
    }

    pub fn appending(&self) -> bool {
        self.has('a')
    }

    /// Existing content is discarded on open
    pub fn truncate(&self) -> bool {
        self.has('w') || self.has('x')
    }

    pub fn create(&self) -> bool {
        self.has('w') || self.has('a') || self.has('x')
    }

    pub fn exclusive(&self) -> bool {
        self.has('x')
    }

    pub fn is_binary(&self) -> bool {
        !self.has('t')
    }
}

impl FromStr for Mode {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
