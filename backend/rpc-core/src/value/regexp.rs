use crate::error::CodecError;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

const VALID_FLAGS: &str = "dgimsuvy";
const EMPTY_SOURCE: &str = "(?:)";

/// A pattern literal in `/source/flags` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExpLiteral {
    source: String,
    flags: String,
}

impl RegExpLiteral {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Compile into a [`Regex`], honouring the `i`, `m` and `s` flags.
    pub fn to_regex(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.source)
            .case_insensitive(self.flags.contains('i'))
            .multi_line(self.flags.contains('m'))
            .dot_matches_new_line(self.flags.contains('s'))
            .build()
    }
}

impl Display for RegExpLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        let source = if self.source.is_empty() {
            EMPTY_SOURCE
        } else {
            &self.source
        };
        write!(f, "/{source}/{}", self.flags)
    }
}

impl FromStr for RegExpLiteral {
    type Err = CodecError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let body = literal.strip_prefix('/').ok_or_else(|| {
            CodecError::malformed(format!("regexp literal must start with '/': {literal}"))
        })?;
        let closing = body.rfind('/').ok_or_else(|| {
            CodecError::malformed(format!("regexp literal is not closed: {literal}"))
        })?;
        let (source, flags) = (&body[..closing], &body[closing + 1..]);

        if let Some(flag) = flags.chars().find(|c| !VALID_FLAGS.contains(*c)) {
            return Err(CodecError::malformed(format!(
                "unknown regexp flag '{flag}' in {literal}"
            )));
        }

        let source = if source == EMPTY_SOURCE { "" } else { source };
        Ok(Self::new(source, flags))
    }
}
