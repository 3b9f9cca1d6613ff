// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors returned while building rules and parsing documents.

use std::{error::Error as StdError, io};

/// The reason a document is not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum SyntaxErrorKind {
    /// The input is not valid UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
    /// The input ended in the middle of a token.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// The input did not contain a root element.
    #[error("document has no root element")]
    NoRootElement,
    /// The input ended before an element was closed.
    #[error("element `{0}` is not closed")]
    UnclosedElement(String),
    /// An end tag did not match the innermost open element.
    #[error("expected end tag for `{expected}` but found `{found}`")]
    MismatchedEndTag {
        /// The name of the innermost open element.
        expected: String,
        /// The name in the end tag.
        found: String,
    },
    /// An end tag was found when no element was open.
    #[error("end tag `{0}` does not close an open element")]
    UnexpectedEndTag(String),
    /// Non-whitespace text was found outside of the root element.
    #[error("content is not allowed outside of the root element")]
    TextOutsideRoot,
    /// An element was found after the root element was closed.
    #[error("markup after the root element is not allowed")]
    MultipleRootElements,
    /// A tag or attribute name is not valid.
    #[error("`{0}` is not a valid name")]
    InvalidName(String),
    /// An attribute did not have a value.
    #[error("attribute `{0}` has no value")]
    AttributeWithoutValue(String),
    /// The same attribute appeared more than once on an element.
    #[error("attribute `{0}` appears more than once")]
    DuplicateAttribute(String),
    /// An entity or character reference is unknown or malformed.
    #[error("`{0}` is not a valid reference")]
    InvalidReference(String),
}

/// The input is not a well-formed document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{kind} at byte {position}")]
pub struct SyntaxError {
    kind: SyntaxErrorKind,
    position: u64,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxErrorKind, position: u64) -> Self {
        Self { kind, position }
    }

    /// The reason the input is malformed.
    #[must_use]
    pub fn kind(&self) -> &SyntaxErrorKind {
        &self.kind
    }

    /// The byte offset in the input where the error was detected.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }
}

/// Errors from reading the input source.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReadError {
    /// The underlying input source failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    /// The input is not well-formed.
    #[error("malformed input: {0}")]
    Syntax(#[from] SyntaxError),
}

/// The default error type for parsing.
///
/// Custom error types must implement `From<Error>` so that malformed input
/// and the default error factories can be expressed with them.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input could not be read or is not well-formed.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// A value was inserted for a name which already held a value.
    #[error("a value of {0} found more than once")]
    DuplicateValue(String),
    /// Required rules did not match anything in the document.
    #[error("rules {} are not processed", .0.join(","))]
    MissingRules(Vec<String>),
    /// A required value was not present in the context.
    #[error("a value of {0} is required but was not found")]
    MissingValue(String),
    /// A converter failed.
    #[error("conversion failed: {0}")]
    Convert(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Wraps a converter's error.
    ///
    /// ```
    /// use maybe_xml_rules::Error;
    ///
    /// let err = "x".parse::<u32>().map_err(Error::convert).unwrap_err();
    /// assert!(matches!(err, Error::Convert(_)));
    /// ```
    pub fn convert<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Error::Convert(err.into())
    }

    /// Returns true if the error is due to malformed input.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Read(ReadError::Syntax(_)))
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Read(ReadError::Syntax(err))
    }
}

/// Errors when building a set of rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// A registered path is malformed.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath {
        /// The registered path.
        path: String,
        /// Why the path is invalid.
        reason: &'static str,
    },
    /// More than one list rule was registered for a path.
    #[error("more than one list rule registered for `{0}`")]
    DuplicateListRule(String),
    /// A name is the target of both a scalar rule and a list rule.
    #[error("`{0}` is the target of both a scalar rule and a list rule")]
    MixedTarget(String),
}
