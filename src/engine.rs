// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Matches events against rules and accumulates values into a [`Context`].

use std::collections::HashSet;

use crate::{
    event::{Attribute, Handler},
    path::PathStack,
    rule::ScalarRule,
    Context, Rules,
};

/// The per-parse state for applying [`Rules`] to a stream of events.
///
/// A `Matcher` is created for each document. The rules are only borrowed, so
/// one set of rules may back any number of matchers.
#[derive(Debug)]
pub(crate) struct Matcher<'r, V, L, E> {
    rules: &'r Rules<V, L, E>,
    stack: PathStack,
    text: Option<String>,
    ctx: Context<V, L>,
    fired: HashSet<&'r str>,
}

impl<'r, V, L, E> Matcher<'r, V, L, E> {
    pub(crate) fn new(rules: &'r Rules<V, L, E>) -> Self {
        Self {
            rules,
            stack: PathStack::new(),
            text: None,
            ctx: Context::new(),
            fired: HashSet::new(),
        }
    }

    /// Returns the context and the required paths which never matched.
    pub(crate) fn finish(self) -> (Context<V, L>, Vec<String>) {
        let missing = self
            .rules
            .mandatory_paths()
            .iter()
            .filter(|path| !self.fired.contains(path.as_str()))
            .cloned()
            .collect();
        (self.ctx, missing)
    }

    fn store(&mut self, rule: &'r ScalarRule<V, E>, raw: &str) -> Result<(), E> {
        let value = (rule.converter)(raw)?;
        if self.ctx.insert(&rule.target, value).is_err() {
            tracing::debug!(path = %rule.path, target = %rule.target, "duplicate value");
            return Err((self.rules.duplicate_value_error)(&rule.target));
        }
        tracing::trace!(path = %rule.path, target = %rule.target, "stored value");
        self.fired.insert(&rule.path);
        Ok(())
    }
}

impl<'r, V, L, E> Handler for Matcher<'r, V, L, E> {
    type Error = E;

    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>]) -> Result<(), E> {
        self.stack.push(name);
        let rules = self.rules;
        let path = self.stack.current();

        self.text = rules.node_rule(path).map(|_| String::new());

        if let Some(attribute_rules) = rules.attribute_rules(path) {
            for attr in attributes {
                if let Some(rule) = attribute_rules.get(attr.name()) {
                    self.store(rule, attr.value())?;
                }
            }
        }

        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), E> {
        if let Some(buf) = &mut self.text {
            buf.push_str(text);
        }
        Ok(())
    }

    fn end_element(&mut self, _name: &str) -> Result<(), E> {
        let rules = self.rules;

        if let Some(rule) = rules.node_rule(self.stack.current()) {
            let text = self.text.take().unwrap_or_default();
            self.store(rule, text.trim())?;
        }

        if let Some(rule) = rules.list_rule(self.stack.current()) {
            let item = (rule.converter)(&mut self.ctx)?;
            self.ctx.append(&rule.target, item);
            tracing::trace!(path = %rule.path, target = %rule.target, "appended item");
            self.fired.insert(&rule.path);
        }

        self.stack.pop();
        Ok(())
    }
}
