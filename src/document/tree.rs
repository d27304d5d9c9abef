use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Key under which XML-to-object demarshalers place an element's attribute bag.
const ATTRIBUTE_KEY: &str = "$";

/// Zero, one or several entries under the same child name.
///
/// Demarshalers collapse a single child into a bare value instead of a
/// one-element list, so every child lookup goes through this type and callers
/// iterate it the same way whatever shape arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OneOrMany<T> {
    Empty,
    Single(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Empty
    }
}

impl<T> OneOrMany<T> {
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Empty => &[],
            OneOrMany::Single(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    /// Entries in encounter order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn push(&mut self, value: T) {
        *self = match std::mem::take(self) {
            OneOrMany::Empty => OneOrMany::Single(value),
            OneOrMany::Single(existing) => OneOrMany::Many(vec![existing, value]),
            OneOrMany::Many(mut values) => {
                values.push(value);
                OneOrMany::Many(values)
            }
        };
    }

    pub fn extend(&mut self, other: OneOrMany<T>) {
        match other {
            OneOrMany::Empty => {}
            OneOrMany::Single(value) => self.push(value),
            OneOrMany::Many(values) => {
                for value in values {
                    self.push(value);
                }
            }
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        if values.is_empty() {
            OneOrMany::Empty
        } else {
            OneOrMany::Many(values)
        }
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A node of the demarshaled document: a scalar leaf or an element with named children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attr {
    Text(String),
    Element(Element),
}

impl Attr {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Attr::Text(text) => Some(text),
            Attr::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Attr::Element(element) => Some(element),
            Attr::Text(_) => None,
        }
    }

    /// Children under `name`; a text leaf has no children.
    pub fn child(&self, name: &str) -> Option<&OneOrMany<Attr>> {
        self.as_element().and_then(|element| element.child(name))
    }

    /// Converts demarshaler output into a tree.
    ///
    /// Objects become elements (with any `$` attribute bag merged into their
    /// children), strings become text, numbers and booleans become their JSON
    /// text. A `null` or an array in node position becomes an empty element.
    pub fn from_json(value: &Value) -> Attr {
        match value {
            Value::Object(map) => Attr::Element(element_from_map(map)),
            Value::String(text) => Attr::Text(text.clone()),
            Value::Number(number) => Attr::Text(number.to_string()),
            Value::Bool(flag) => Attr::Text(flag.to_string()),
            Value::Null | Value::Array(_) => Attr::Element(Element::default()),
        }
    }
}

impl From<Element> for Attr {
    fn from(element: Element) -> Self {
        Attr::Element(element)
    }
}

impl From<&str> for Attr {
    fn from(text: &str) -> Self {
        Attr::Text(text.to_string())
    }
}

impl From<String> for Attr {
    fn from(text: String) -> Self {
        Attr::Text(text)
    }
}

impl From<Attr> for OneOrMany<Attr> {
    fn from(attr: Attr) -> Self {
        OneOrMany::Single(attr)
    }
}

impl From<&str> for OneOrMany<Attr> {
    fn from(text: &str) -> Self {
        OneOrMany::Single(Attr::from(text))
    }
}

impl From<Element> for OneOrMany<Attr> {
    fn from(element: Element) -> Self {
        OneOrMany::Single(Attr::Element(element))
    }
}

impl From<&Value> for Attr {
    fn from(value: &Value) -> Self {
        Attr::from_json(value)
    }
}

impl<'de> Deserialize<'de> for Attr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Attr::from_json(&value))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    children: BTreeMap<String, OneOrMany<Attr>>,
}

impl Element {
    pub(crate) const EMPTY: Element = Element {
        children: BTreeMap::new(),
    };

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Element::insert`].
    pub fn with<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<OneOrMany<Attr>>,
    {
        self.insert(name, value);
        self
    }

    /// Appends to whatever is already stored under `name`.
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<OneOrMany<Attr>>,
    {
        self.children
            .entry(name.into())
            .or_default()
            .extend(value.into());
    }

    /// Marks `name` as present with zero entries.
    pub fn insert_empty<N: Into<String>>(&mut self, name: N) {
        self.children.entry(name.into()).or_default();
    }

    pub fn child(&self, name: &str) -> Option<&OneOrMany<Attr>> {
        self.children.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn element_from_map(map: &Map<String, Value>) -> Element {
    let mut element = Element::new();
    for (key, value) in map {
        match (key.as_str(), value) {
            (ATTRIBUTE_KEY, Value::Object(attributes)) => {
                for (name, attribute) in attributes {
                    element.insert(name.as_str(), children_from_json(attribute));
                }
            }
            _ => element.insert(key.as_str(), children_from_json(value)),
        }
    }
    element
}

fn children_from_json(value: &Value) -> OneOrMany<Attr> {
    match value {
        Value::Null => OneOrMany::Empty,
        Value::Array(items) => {
            let mut flat = Vec::with_capacity(items.len());
            flatten_into(items, &mut flat);
            OneOrMany::from(flat)
        }
        other => OneOrMany::Single(Attr::from_json(other)),
    }
}

fn flatten_into(items: &[Value], out: &mut Vec<Attr>) {
    for item in items {
        match item {
            Value::Array(nested) => flatten_into(nested, out),
            Value::Null => {}
            other => out.push(Attr::from_json(other)),
        }
    }
}
