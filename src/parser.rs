// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parses documents with a set of [`Rules`] and builds a result.

use std::io::{BufRead, BufReader, Read};

use crate::{engine::Matcher, reader::EventReader, Context, Error, Rules};

type ResultBuilder<V, L, T, E> = Box<dyn Fn(Context<V, L>) -> Result<T, E> + Send + Sync>;

impl<V, L, E> Rules<V, L, E>
where
    E: From<Error>,
{
    /// Parses a document and returns the accumulated context.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or is malformed, if a
    /// scalar name receives more than one value, if a required rule did not
    /// match, or if a converter fails.
    pub fn parse<B>(&self, input: B) -> Result<Context<V, L>, E>
    where
        B: BufRead,
    {
        tracing::debug!("parsing document");

        let mut matcher = Matcher::new(self);
        EventReader::from_reader(input).read_to_end(&mut matcher)?;

        let (ctx, missing) = matcher.finish();
        if !missing.is_empty() {
            tracing::debug!(missing = ?missing, "required rules did not match");
            return Err((self.missing_rules_error)(&missing));
        }

        tracing::debug!(names = ctx.len(), "parsed document");
        Ok(ctx)
    }

    /// Parses a document from an unbuffered input source.
    ///
    /// # Errors
    ///
    /// See [`Rules::parse()`].
    pub fn parse_reader<R>(&self, input: R) -> Result<Context<V, L>, E>
    where
        R: Read,
    {
        self.parse(BufReader::new(input))
    }

    /// Parses a document from a string.
    ///
    /// # Errors
    ///
    /// See [`Rules::parse()`].
    pub fn parse_str(&self, input: &str) -> Result<Context<V, L>, E> {
        self.parse(input.as_bytes())
    }

    /// Parses a document from a byte slice.
    ///
    /// # Errors
    ///
    /// See [`Rules::parse()`].
    pub fn parse_slice(&self, input: &[u8]) -> Result<Context<V, L>, E> {
        self.parse(input)
    }

    /// Uses a function to build the result from the final context.
    #[must_use]
    pub fn with_result_builder<T, F>(self, builder: F) -> Parser<V, L, T, E>
    where
        F: Fn(Context<V, L>) -> Result<T, E> + Send + Sync + 'static,
    {
        Parser {
            rules: self,
            builder: Box::new(builder),
        }
    }
}

/// Parses documents with a set of [`Rules`] and transforms the final
/// [`Context`] into a result.
///
/// # Example
///
/// ```
/// use maybe_xml_rules::{Error, Rules};
///
/// let parser = Rules::<String, String, Error>::builder()
///     .scalar("catalog/book/title")
///     .list(("catalog/book", "titles"), |ctx| ctx.pop_required("title"))
///     .build()?
///     .with_result_builder(|mut ctx| Ok(ctx.take_list("titles")));
///
/// let titles = parser.parse_str(
///     "<catalog><book><title>A</title></book><book><title>B</title></book></catalog>",
/// )?;
/// assert_eq!(titles, ["A", "B"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Parser<V, L, T, E> {
    rules: Rules<V, L, E>,
    builder: ResultBuilder<V, L, T, E>,
}

impl<V, L, T, E> core::fmt::Debug for Parser<V, L, T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl<V, L, T, E> Parser<V, L, T, E>
where
    E: From<Error>,
{
    /// The rules used to parse documents.
    #[must_use]
    pub fn rules(&self) -> &Rules<V, L, E> {
        &self.rules
    }

    /// Replaces the function which builds the result.
    #[must_use]
    pub fn with_result_builder<U, F>(self, builder: F) -> Parser<V, L, U, E>
    where
        F: Fn(Context<V, L>) -> Result<U, E> + Send + Sync + 'static,
    {
        self.rules.with_result_builder(builder)
    }

    /// Parses a document and builds the result.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Rules::parse()`] or from the result builder.
    pub fn parse<B>(&self, input: B) -> Result<T, E>
    where
        B: BufRead,
    {
        let ctx = self.rules.parse(input)?;
        (self.builder)(ctx)
    }

    /// Parses a document from an unbuffered input source and builds the result.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse()`].
    pub fn parse_reader<R>(&self, input: R) -> Result<T, E>
    where
        R: Read,
    {
        self.parse(BufReader::new(input))
    }

    /// Parses a document from a string and builds the result.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse()`].
    pub fn parse_str(&self, input: &str) -> Result<T, E> {
        self.parse(input.as_bytes())
    }

    /// Parses a document from a byte slice and builds the result.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse()`].
    pub fn parse_slice(&self, input: &[u8]) -> Result<T, E> {
        self.parse(input)
    }
}
