// Copyright 2023 Bryant Luk
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registration of rules.

use std::collections::{HashMap, HashSet};

use crate::{
    path::{self, RulePath},
    rule::{ListRule, Rule, ScalarRule},
    Binding, Context, Error, RuleError,
};

pub(crate) type DuplicateValueFactory<E> = Box<dyn Fn(&str) -> E + Send + Sync>;

pub(crate) type MissingRulesFactory<E> = Box<dyn Fn(&[String]) -> E + Send + Sync>;

/// Collects rules before they are validated and turned into [`Rules`].
///
/// Registration order does not matter. Registering a scalar rule for a path
/// which already has one replaces the earlier rule. A rule which is
/// registered as required at least once is required.
///
/// ```
/// use maybe_xml_rules::{Binding, Error, Rules};
///
/// let rules = Rules::<String, String, Error>::builder()
///     .scalar("catalog/book/title")
///     .scalar(Binding::new("catalog/book/price").optional())
///     .list(("catalog/book", "titles"), |ctx| ctx.pop_required("title"))
///     .build()?;
///
/// let ctx = rules.parse_str("<catalog><book><title>T</title></book></catalog>")?;
/// assert_eq!(Some(&["T".to_string()][..]), ctx.list("titles"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct RulesBuilder<V = String, L = V, E = Error> {
    rules: Vec<Rule<V, L, E>>,
    mandatory: Vec<String>,
    duplicate_value_error: Option<DuplicateValueFactory<E>>,
    missing_rules_error: Option<MissingRulesFactory<E>>,
}

impl<V, L, E> core::fmt::Debug for RulesBuilder<V, L, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RulesBuilder")
            .field("rules", &self.rules)
            .field("mandatory", &self.mandatory)
            .finish_non_exhaustive()
    }
}

impl<V, L, E> Default for RulesBuilder<V, L, E> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            mandatory: Vec::new(),
            duplicate_value_error: None,
            missing_rules_error: None,
        }
    }
}

impl<V, L, E> RulesBuilder<V, L, E>
where
    V: 'static,
    L: 'static,
    E: From<Error> + 'static,
{
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the element text or attribute value as is.
    #[must_use]
    pub fn scalar(self, binding: impl Into<Binding>) -> Self
    where
        V: From<String>,
    {
        self.scalar_with(binding, |text| Ok(V::from(text.to_string())))
    }

    /// Stores the converted element text or attribute value.
    ///
    /// A path containing `@` refers to an attribute. Element text has leading
    /// and trailing whitespace removed before it is converted.
    #[must_use]
    pub fn scalar_with<F>(mut self, binding: impl Into<Binding>, converter: F) -> Self
    where
        F: Fn(&str) -> Result<V, E> + Send + Sync + 'static,
    {
        let binding = binding.into();
        self.require(&binding);

        let rule = ScalarRule {
            path: binding.path().to_string(),
            target: binding.target().to_string(),
            converter: Box::new(converter),
        };
        let rule = match RulePath::parse(binding.path()) {
            RulePath::Node(_) => Rule::Node(rule),
            RulePath::Attribute { .. } => Rule::Attribute(rule),
        };
        self.rules.push(rule);
        self
    }

    /// Appends an item built from the context when an element closes.
    ///
    /// The converter should pop the values it reads so that the next
    /// occurrence of the element can store its own values.
    #[must_use]
    pub fn list<F>(mut self, binding: impl Into<Binding>, converter: F) -> Self
    where
        F: Fn(&mut Context<V, L>) -> Result<L, E> + Send + Sync + 'static,
    {
        let binding = binding.into();
        self.require(&binding);

        self.rules.push(Rule::List(ListRule {
            path: binding.path().to_string(),
            target: binding.target().to_string(),
            converter: Box::new(converter),
        }));
        self
    }

    /// Sets the error returned when a scalar name receives a second value.
    ///
    /// The function is given the target name.
    #[must_use]
    pub fn duplicate_value_error<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> E + Send + Sync + 'static,
    {
        self.duplicate_value_error = Some(Box::new(factory));
        self
    }

    /// Sets the error returned when required rules did not match.
    ///
    /// The function is given every path which did not match.
    #[must_use]
    pub fn missing_rules_error<F>(mut self, factory: F) -> Self
    where
        F: Fn(&[String]) -> E + Send + Sync + 'static,
    {
        self.missing_rules_error = Some(Box::new(factory));
        self
    }

    fn require(&mut self, binding: &Binding) {
        if !binding.is_optional() && !self.mandatory.iter().any(|p| p == binding.path()) {
            self.mandatory.push(binding.path().to_string());
        }
    }

    /// Validates the registered rules.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is malformed, if more than one list rule is
    /// registered for a path, or if a name is the target of both scalar and
    /// list rules.
    pub fn build(self) -> Result<Rules<V, L, E>, RuleError> {
        let mut nodes = HashMap::new();
        let mut attributes: HashMap<String, HashMap<String, ScalarRule<V, E>>> = HashMap::new();
        let mut lists = HashMap::new();
        let mut scalar_targets = HashSet::new();
        let mut list_targets = HashSet::new();

        for rule in self.rules {
            path::validate(rule.path()).map_err(|reason| RuleError::InvalidPath {
                path: rule.path().to_string(),
                reason,
            })?;

            match rule {
                Rule::Node(rule) => {
                    scalar_targets.insert(rule.target.clone());
                    nodes.insert(rule.path.clone(), rule);
                }
                Rule::Attribute(rule) => {
                    scalar_targets.insert(rule.target.clone());
                    if let RulePath::Attribute { node, name } = RulePath::parse(&rule.path) {
                        let (node, name) = (node.to_string(), name.to_string());
                        attributes.entry(node).or_default().insert(name, rule);
                    }
                }
                Rule::List(rule) => {
                    if let RulePath::Attribute { .. } = RulePath::parse(&rule.path) {
                        return Err(RuleError::InvalidPath {
                            path: rule.path,
                            reason: "list rules cannot refer to an attribute",
                        });
                    }
                    if lists.contains_key(&rule.path) {
                        return Err(RuleError::DuplicateListRule(rule.path));
                    }
                    list_targets.insert(rule.target.clone());
                    lists.insert(rule.path.clone(), rule);
                }
            }
        }

        if let Some(target) = scalar_targets.intersection(&list_targets).min() {
            return Err(RuleError::MixedTarget(target.clone()));
        }

        tracing::debug!(
            nodes = nodes.len(),
            attributes = attributes.values().map(HashMap::len).sum::<usize>(),
            lists = lists.len(),
            mandatory = self.mandatory.len(),
            "built rules"
        );

        Ok(Rules {
            nodes,
            attributes,
            lists,
            mandatory: self.mandatory,
            duplicate_value_error: self
                .duplicate_value_error
                .unwrap_or_else(|| {
                    Box::new(|name: &str| E::from(Error::DuplicateValue(name.to_string())))
                }),
            missing_rules_error: self
                .missing_rules_error
                .unwrap_or_else(|| {
                    Box::new(|paths: &[String]| E::from(Error::MissingRules(paths.to_vec())))
                }),
        })
    }
}

/// A validated and immutable set of rules.
///
/// The rules can be used for any number of parses. Each parse has its own
/// [`Context`], so different documents can be parsed concurrently with the
/// same rules.
pub struct Rules<V = String, L = V, E = Error> {
    nodes: HashMap<String, ScalarRule<V, E>>,
    attributes: HashMap<String, HashMap<String, ScalarRule<V, E>>>,
    lists: HashMap<String, ListRule<V, L, E>>,
    mandatory: Vec<String>,
    pub(crate) duplicate_value_error: DuplicateValueFactory<E>,
    pub(crate) missing_rules_error: MissingRulesFactory<E>,
}

impl<V, L, E> core::fmt::Debug for Rules<V, L, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rules")
            .field("nodes", &self.nodes)
            .field("attributes", &self.attributes)
            .field("lists", &self.lists)
            .field("mandatory", &self.mandatory)
            .finish_non_exhaustive()
    }
}

impl<V, L, E> Rules<V, L, E>
where
    V: 'static,
    L: 'static,
    E: From<Error> + 'static,
{
    /// Creates a builder to register rules.
    #[must_use]
    pub fn builder() -> RulesBuilder<V, L, E> {
        RulesBuilder::new()
    }
}

impl<V, L, E> Rules<V, L, E> {
    /// The paths which must match at least once, in registration order.
    #[must_use]
    pub fn mandatory_paths(&self) -> &[String] {
        &self.mandatory
    }

    pub(crate) fn node_rule(&self, path: &str) -> Option<&ScalarRule<V, E>> {
        self.nodes.get(path)
    }

    pub(crate) fn attribute_rules(&self, path: &str) -> Option<&HashMap<String, ScalarRule<V, E>>> {
        self.attributes.get(path)
    }

    pub(crate) fn list_rule(&self, path: &str) -> Option<&ListRule<V, L, E>> {
        self.lists.get(path)
    }
}
