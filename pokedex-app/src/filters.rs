use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::global_state::pokemon_types::PokemonType;

/// The dimensions the catalog can be narrowed along.
///
/// Filters are applied in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Favourite,
    Types,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl FilterValue {
    /// Empty text and `false` are falsy, everything else (an empty list included) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Bool(value) => *value,
            FilterValue::Text(text) => !text.is_empty(),
            FilterValue::List(_) => true,
        }
    }

    /// The value read as a list of identifiers. A bare string is a list of one.
    pub fn as_list(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            FilterValue::Bool(_) => Default::default(),
            FilterValue::Text(text) => std::slice::from_ref(text),
            FilterValue::List(list) => list,
        };
        items.iter().map(String::as_str)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[PokemonType]> for FilterValue {
    fn from(value: &[PokemonType]) -> Self {
        Self::List(value.iter().map(|t| t.as_str().to_string()).collect())
    }
}

/// Filter field to value. A field that is present but `None` is the same as no filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters(BTreeMap<Field, Option<FilterValue>>);

impl Filters {
    pub fn get(&self, field: Field) -> Option<&FilterValue> {
        self.0.get(&field).and_then(Option::as_ref)
    }

    pub fn contains_field(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn set(&mut self, field: Field, value: Option<FilterValue>) {
        self.0.insert(field, value);
    }

    /// Blanks the field but keeps the key around.
    pub fn clear(&mut self, field: Field) {
        self.set(field, None);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&FilterValue>)> {
        self.0.iter().map(|(field, value)| (*field, value.as_ref()))
    }
}
