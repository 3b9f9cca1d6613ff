// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Push-style events delivered while a document is read.

use std::borrow::Cow;

/// An attribute on a start tag with its value decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute<'a> {
    name: &'a str,
    value: Cow<'a, str>,
}

impl<'a> Attribute<'a> {
    /// Instantiates a new attribute.
    #[must_use]
    pub fn new(name: &'a str, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    /// The attribute's name as written, including any namespace prefix.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The attribute's value with references decoded.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Receives events in document order.
///
/// The [`EventReader`][crate::reader::EventReader] calls the methods while it
/// reads the input. An error returned from any method stops the read and is
/// returned to the caller unmodified.
pub trait Handler {
    /// The error returned by the handler.
    type Error;

    /// An element was opened.
    ///
    /// # Errors
    ///
    /// Any error stops the read.
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>]) -> Result<(), Self::Error>;

    /// Text content was found.
    ///
    /// The text of a single element may be delivered in more than one call.
    ///
    /// # Errors
    ///
    /// Any error stops the read.
    fn characters(&mut self, text: &str) -> Result<(), Self::Error>;

    /// An element was closed.
    ///
    /// # Errors
    ///
    /// Any error stops the read.
    fn end_element(&mut self, name: &str) -> Result<(), Self::Error>;
}
