use crate::schema::Schema;
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Document-scoped registry of named schemas.
///
/// A definition is reserved before it is expanded. A cyclic type that reaches
/// its own name while being expanded finds the reservation and gets a `$ref`
/// instead of recursing again.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    /// `None` marks a reserved definition whose expansion is still running
    entries: BTreeMap<String, Option<Schema>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to `name`, expanding it first if it was never seen.
    pub fn resolve<F>(&mut self, name: &str, expand: F) -> Schema
    where
        F: FnOnce(&mut Self) -> Schema,
    {
        if self.entries.contains_key(name) {
            debug!("Definition {} already registered", name);
        } else {
            debug!("Expanding definition {}", name);
            self.entries.insert(name.to_string(), None);
            let schema = expand(self);
            self.entries.insert(name.to_string(), Some(schema));
        }
        Schema::reference(name)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries.get(name).and_then(Option::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of completed definitions.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|entry| entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.entries
            .iter()
            .filter_map(|(name, schema)| schema.as_ref().map(|s| (name.as_str(), s)))
    }
}

impl Serialize for DefinitionRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, schema) in self.iter() {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}
