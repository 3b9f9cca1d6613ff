// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Paths identify an element by the names of all of its open ancestors.
//!
//! A node path is the `/` joined sequence of tag names from the outermost
//! open element down to the element itself, like `catalog/book/title`. There
//! is no leading root marker.
//!
//! An attribute reference is a node path followed by `@` and the attribute
//! name, like `catalog/book@id`.

/// Separates tag names in a node path.
pub const SEPARATOR: char = '/';

/// Separates a node path from an attribute name.
pub const ATTRIBUTE_SEPARATOR: char = '@';

/// A registered path, classified by what it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RulePath<'a> {
    /// The text content of an element.
    Node(&'a str),
    /// The value of an attribute on an element.
    Attribute {
        /// The path of the element which owns the attribute.
        node: &'a str,
        /// The attribute's name.
        name: &'a str,
    },
}

impl<'a> RulePath<'a> {
    /// Classifies a path by the presence of the attribute separator.
    ///
    /// ```
    /// use maybe_xml_rules::path::RulePath;
    ///
    /// assert_eq!(RulePath::parse("catalog/book"), RulePath::Node("catalog/book"));
    /// assert_eq!(
    ///     RulePath::parse("catalog/book@id"),
    ///     RulePath::Attribute { node: "catalog/book", name: "id" }
    /// );
    /// ```
    #[must_use]
    pub fn parse(path: &'a str) -> Self {
        match path.split_once(ATTRIBUTE_SEPARATOR) {
            Some((node, name)) => RulePath::Attribute { node, name },
            None => RulePath::Node(path),
        }
    }

    /// The path of the element the rule path refers to.
    #[must_use]
    pub const fn node(&self) -> &'a str {
        match *self {
            RulePath::Node(node) | RulePath::Attribute { node, .. } => node,
        }
    }

    /// The last name in the path.
    ///
    /// For an attribute reference, it is the attribute name.
    #[must_use]
    pub fn last_segment(&self) -> &'a str {
        match *self {
            RulePath::Node(node) => node.rsplit(SEPARATOR).next().unwrap_or(node),
            RulePath::Attribute { name, .. } => name,
        }
    }
}

/// Returns why a path cannot be registered, if it is malformed.
pub(crate) fn validate(path: &str) -> Result<(), &'static str> {
    if path.is_empty() {
        return Err("path is empty");
    }

    if path.matches(ATTRIBUTE_SEPARATOR).count() > 1 {
        return Err("path has more than one attribute separator");
    }

    let rule_path = RulePath::parse(path);
    if let RulePath::Attribute { name, .. } = rule_path {
        if name.is_empty() {
            return Err("attribute name is empty");
        }
        if name.contains(SEPARATOR) || name.contains(char::is_whitespace) {
            return Err("attribute name is not a valid name");
        }
    }

    for segment in rule_path.node().split(SEPARATOR) {
        if segment.is_empty() {
            return Err("path has an empty tag name");
        }
        if segment.contains(char::is_whitespace) {
            return Err("tag name contains whitespace");
        }
    }

    Ok(())
}

/// The names of the currently open elements.
#[derive(Debug, Default, Clone)]
pub(crate) struct PathStack {
    path: String,
    lens: Vec<usize>,
}

impl PathStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Opens an element.
    pub(crate) fn push(&mut self, name: &str) {
        self.lens.push(self.path.len());
        if !self.path.is_empty() {
            self.path.push(SEPARATOR);
        }
        self.path.push_str(name);
    }

    /// Closes the innermost open element.
    pub(crate) fn pop(&mut self) {
        if let Some(len) = self.lens.pop() {
            self.path.truncate(len);
        }
    }

    /// The path of the innermost open element.
    pub(crate) fn current(&self) -> &str {
        &self.path
    }
}
