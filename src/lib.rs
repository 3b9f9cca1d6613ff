// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! MaybeXmlRules extracts values from [XML][xml] documents with declarative
//! rules. It reads the document in a single pass with the [`maybe_xml`] lexer
//! and does not build an in-memory tree.
//!
//! The library does 3 things:
//!
//! 1. [`Rules`] bind paths to names. A path is the `/` joined names of an
//!    element and all of its ancestors (e.g. `catalog/book/title`). A path
//!    with an `@` refers to an attribute (e.g. `catalog/book@id`).
//!
//!    A scalar rule converts the text of an element or the value of an
//!    attribute and stores it under a name. A list rule runs when an element
//!    closes, builds an item from the values stored so far, and appends the
//!    item to a list.
//!
//! 2. While the document is read, every start tag, end tag and text event is
//!    matched against the rules, and the converted values are accumulated in a
//!    [`Context`].
//!
//! 3. After the document is read, every required rule must have matched at
//!    least once. The final [`Context`] is then returned or given to a function
//!    which builds the result.
//!
//! # Usage
//!
//! Repeated elements (like many `book` elements in a `catalog`) store their
//! values under the same names. A list rule should [`pop`][Context::pop] the
//! values it reads. Otherwise, the next element would store a second value
//! under the same name, which is an [`Error::DuplicateValue`].
//!
//! # Example
//!
//! ```
//! use maybe_xml_rules::{Binding, Error, Rules};
//!
//! #[derive(Debug, PartialEq)]
//! struct Book {
//!     id: String,
//!     author: String,
//!     title: String,
//!     price: f64,
//! }
//!
//! let parser = Rules::<String, Book, Error>::builder()
//!     .scalar("catalog/book@id")
//!     .scalar("catalog/book/author")
//!     .scalar("catalog/book/title")
//!     .scalar(Binding::new("catalog/book/price").optional())
//!     .list(("catalog/book", "books"), |ctx| {
//!         let price = match ctx.pop("price") {
//!             Some(price) => price.parse().map_err(Error::convert)?,
//!             None => 0.0,
//!         };
//!         Ok(Book {
//!             id: ctx.pop_required("id")?,
//!             author: ctx.pop_required("author")?,
//!             title: ctx.pop_required("title")?,
//!             price,
//!         })
//!     })
//!     .build()?
//!     .with_result_builder(|mut ctx| Ok(ctx.take_list("books")));
//!
//! let books = parser.parse_str(
//!     r#"<catalog>
//!          <book id="1"><author>A</author><title>T</title><price>9.99</price></book>
//!          <book id="2"><author>B</author><title>U</title></book>
//!        </catalog>"#,
//! )?;
//!
//! assert_eq!(books.len(), 2);
//! assert_eq!(books[0].title, "T");
//! assert_eq!(books[0].price, 9.99);
//! assert_eq!(books[1].id, "2");
//! assert_eq!(books[1].price, 0.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Errors
//!
//! Every error stops the parse and no partial result is returned.
//!
//! * Input which cannot be read or which is not well-formed is an
//!   [`Error::Read`].
//! * A second value for a scalar name is an [`Error::DuplicateValue`].
//! * Required rules which never matched are reported together in an
//!   [`Error::MissingRules`].
//! * Errors from converters and the result builder are returned unmodified.
//!
//! A custom error type may be used if it implements `From<Error>`. The
//! duplicate value and missing rules errors can be constructed with
//! [`RulesBuilder::duplicate_value_error()`] and
//! [`RulesBuilder::missing_rules_error()`].
//!
//! [xml]: https://www.w3.org/TR/2006/REC-xml11-20060816/

#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

mod context;
mod engine;
mod error;
pub mod event;
mod parser;
pub mod path;
pub mod reader;
mod registry;
mod rule;

pub use context::Context;
pub use error::{Error, ReadError, RuleError, SyntaxError, SyntaxErrorKind};
pub use parser::Parser;
pub use registry::{Rules, RulesBuilder};
pub use rule::Binding;
