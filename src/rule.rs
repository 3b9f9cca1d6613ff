// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rules bind a path to a named slot in the [`Context`].

use core::fmt;

use crate::{path::RulePath, Context};

/// Where a rule matches, what name it stores to, and whether it must match.
///
/// A binding can be created from a path alone, in which case the target name
/// is the last name in the path and the rule is required.
///
/// ```
/// use maybe_xml_rules::Binding;
///
/// let binding = Binding::from("catalog/book/title");
/// assert_eq!(binding.path(), "catalog/book/title");
/// assert_eq!(binding.target(), "title");
/// assert!(!binding.is_optional());
///
/// let binding = Binding::from("catalog/book@id");
/// assert_eq!(binding.target(), "id");
///
/// let binding = Binding::new("catalog/book/price").to("cost").optional();
/// assert_eq!(binding.target(), "cost");
/// assert!(binding.is_optional());
///
/// let binding = Binding::from(("catalog/book", "books"));
/// assert_eq!(binding.target(), "books");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    path: String,
    target: Option<String>,
    optional: bool,
}

impl Binding {
    /// Creates a required binding for a path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target: None,
            optional: false,
        }
    }

    /// Stores the value under an explicit name.
    #[must_use]
    pub fn to(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Marks the rule as not required to match.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The path the rule matches.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The name the value is stored under.
    #[must_use]
    pub fn target(&self) -> &str {
        match &self.target {
            Some(target) => target,
            None => RulePath::parse(&self.path).last_segment(),
        }
    }

    /// Returns true if the rule is not required to match.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl From<&str> for Binding {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Binding {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl<P, T> From<(P, T)> for Binding
where
    P: Into<String>,
    T: Into<String>,
{
    fn from((path, target): (P, T)) -> Self {
        Self::new(path).to(target)
    }
}

pub(crate) type ScalarConverter<V, E> = Box<dyn Fn(&str) -> Result<V, E> + Send + Sync>;

pub(crate) type ListConverter<V, L, E> =
    Box<dyn Fn(&mut Context<V, L>) -> Result<L, E> + Send + Sync>;

/// Converts the text of an element or the value of an attribute.
pub(crate) struct ScalarRule<V, E> {
    pub(crate) path: String,
    pub(crate) target: String,
    pub(crate) converter: ScalarConverter<V, E>,
}

/// Converts the context into a list item when an element closes.
pub(crate) struct ListRule<V, L, E> {
    pub(crate) path: String,
    pub(crate) target: String,
    pub(crate) converter: ListConverter<V, L, E>,
}

/// A registered rule.
pub(crate) enum Rule<V, L, E> {
    Node(ScalarRule<V, E>),
    Attribute(ScalarRule<V, E>),
    List(ListRule<V, L, E>),
}

impl<V, L, E> Rule<V, L, E> {
    pub(crate) fn path(&self) -> &str {
        match self {
            Rule::Node(rule) | Rule::Attribute(rule) => &rule.path,
            Rule::List(rule) => &rule.path,
        }
    }
}

impl<V, E> fmt::Debug for ScalarRule<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarRule")
            .field("path", &self.path)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<V, L, E> fmt::Debug for ListRule<V, L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListRule")
            .field("path", &self.path)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<V, L, E> fmt::Debug for Rule<V, L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Node(rule) => f.debug_tuple("Node").field(rule).finish(),
            Rule::Attribute(rule) => f.debug_tuple("Attribute").field(rule).finish(),
            Rule::List(rule) => f.debug_tuple("List").field(rule).finish(),
        }
    }
}
