// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The values accumulated while a document is parsed.

use std::collections::HashMap;

use crate::Error;

/// Named values produced by rules during a single parse.
///
/// Scalar rules insert values of type `V` and list rules append items of type
/// `L`. A scalar name may only hold one value at a time; inserting a second
/// value is a duplicate value error during a parse.
///
/// Elements which repeat (like many `book` elements in a `catalog`) trigger
/// the same scalar rules for each occurrence. The list rule which builds an
/// entry from those values should [`pop`][Context::pop] them so that the next
/// occurrence can insert its own values.
///
/// ```
/// use maybe_xml_rules::Context;
///
/// let mut ctx = Context::<String>::new();
/// assert!(ctx.insert("author", "A".to_string()).is_ok());
/// assert_eq!(Err("B".to_string()), ctx.insert("author", "B".to_string()));
///
/// assert_eq!(Some("A".to_string()), ctx.pop("author"));
/// assert_eq!(None, ctx.pop("author"));
/// assert!(ctx.insert("author", "B".to_string()).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context<V, L = V> {
    values: HashMap<String, V>,
    lists: HashMap<String, Vec<L>>,
}

impl<V, L> Default for Context<V, L> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            lists: HashMap::new(),
        }
    }
}

impl<V, L> Context<V, L> {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.values.get(name)
    }

    /// Returns true if a value is held for a name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Inserts a value if the name does not already hold a value.
    ///
    /// # Errors
    ///
    /// If the name already holds a value, the existing value is kept and the
    /// given value is returned.
    pub fn insert(&mut self, name: &str, value: V) -> Result<(), V> {
        if self.values.contains_key(name) {
            return Err(value);
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Removes and returns the value for a name.
    ///
    /// Returns `None` if the name never held a value or was already popped.
    pub fn pop(&mut self, name: &str) -> Option<V> {
        self.values.remove(name)
    }

    /// Removes and returns the value for a name which must be present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValue`] if the name does not hold a value.
    pub fn pop_required(&mut self, name: &str) -> Result<V, Error> {
        self.values
            .remove(name)
            .ok_or_else(|| Error::MissingValue(name.to_string()))
    }

    /// Appends an item to the list for a name, creating the list if needed.
    pub fn append(&mut self, name: &str, item: L) {
        if let Some(list) = self.lists.get_mut(name) {
            list.push(item);
        } else {
            self.lists.insert(name.to_string(), vec![item]);
        }
    }

    /// Returns the list for a name.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[L]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    /// Removes and returns the list for a name.
    ///
    /// Returns an empty list if nothing was appended under the name.
    pub fn take_list(&mut self, name: &str) -> Vec<L> {
        self.lists.remove(name).unwrap_or_default()
    }

    /// The number of names holding a scalar value or a list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() + self.lists.len()
    }

    /// Returns true if there are no scalar values and no lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.lists.is_empty()
    }

    /// Iterates over the scalar values held.
    pub fn values(&self) -> impl Iterator<Item = (&str, &V)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates over the lists held.
    pub fn lists(&self) -> impl Iterator<Item = (&str, &[L])> {
        self.lists
            .iter()
            .map(|(name, list)| (name.as_str(), list.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_clears_the_slot() {
        let mut ctx = Context::<u32>::new();
        ctx.insert("id", 1).unwrap();
        assert!(ctx.contains("id"));
        assert_eq!(ctx.pop("id"), Some(1));
        assert!(!ctx.contains("id"));
        assert_eq!(ctx.get("id"), None);
        ctx.insert("id", 2).unwrap();
        assert_eq!(ctx.get("id"), Some(&2));
    }

    #[test]
    fn pop_required_fails_when_absent() {
        let mut ctx = Context::<u32>::new();
        ctx.insert("id", 1).unwrap();
        assert_eq!(ctx.pop_required("id").unwrap(), 1);

        let err = ctx.pop_required("id").unwrap_err();
        assert!(matches!(err, Error::MissingValue(name) if name == "id"));
    }

    #[test]
    fn insert_keeps_the_existing_value() {
        let mut ctx = Context::<u32>::new();
        ctx.insert("id", 1).unwrap();
        assert_eq!(ctx.insert("id", 2), Err(2));
        assert_eq!(ctx.get("id"), Some(&1));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn append_accumulates_in_order() {
        let mut ctx = Context::<u32, &str>::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.list("books"), None);

        ctx.append("books", "a");
        ctx.append("books", "b");
        ctx.append("books", "c");
        assert!(!ctx.is_empty());
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.list("books"), Some(&["a", "b", "c"][..]));

        assert_eq!(ctx.take_list("books"), vec!["a", "b", "c"]);
        assert_eq!(ctx.take_list("books"), Vec::<&str>::new());
        assert!(ctx.is_empty());
    }

    #[test]
    fn values_and_lists_iterate() {
        let mut ctx = Context::<u32>::new();
        ctx.insert("a", 1).unwrap();
        ctx.append("b", 2);

        let values = ctx.values().collect::<Vec<_>>();
        assert_eq!(values, vec![("a", &1)]);
        let lists = ctx.lists().collect::<Vec<_>>();
        assert_eq!(lists, vec![("b", &[2][..])]);
    }

    #[test]
    fn len_agrees_with_is_empty() {
        let mut ctx = Context::<u32>::new();
        assert_eq!(ctx.len(), 0);
        assert!(ctx.is_empty());

        ctx.append("b", 2);
        assert_eq!(ctx.len(), 1);
        assert!(!ctx.is_empty());

        ctx.insert("a", 1).unwrap();
        assert_eq!(ctx.len(), 2);

        ctx.take_list("b");
        ctx.pop("a");
        assert_eq!(ctx.len(), 0);
        assert!(ctx.is_empty());
    }
}
