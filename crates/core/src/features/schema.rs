use anyhow::{bail, ensure};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered column names a model was trained on. Cloning shares the underlying list.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    inner: Arc<SchemaInner>,
}

#[derive(Debug)]
struct SchemaInner {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        ensure!(!names.is_empty(), "feature schema must be non-empty");

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            ensure!(!name.trim().is_empty(), "feature name at position {i} is empty");
            if index.insert(name.clone(), i).is_some() {
                bail!("duplicate feature name in schema: {name}");
            }
        }

        Ok(Self {
            inner: Arc::new(SchemaInner { names, index }),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.inner.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.index.contains_key(name)
    }

    /// True when both handles point at the same schema or list identical names.
    pub fn same_as(&self, other: &FeatureSchema) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.names == other.inner.names
    }

    /// A row with every column set to zero.
    pub fn zeroed_row(&self) -> FeatureRow {
        FeatureRow {
            schema: self.clone(),
            values: vec![0.0; self.len()],
        }
    }
}

/// One value per schema column, in schema order.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureRow {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|i| self.values[i])
    }

    /// Returns false (and leaves the row unchanged) when `name` is not a schema column.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.schema.position(name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl PartialEq for FeatureRow {
    fn eq(&self, other: &Self) -> bool {
        self.schema.same_as(&other.schema) && self.values == other.values
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
