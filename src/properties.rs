//! Ordered string properties shared by every configuration type.
//!
//! Kafka, ZooKeeper and Kafka Connect are all configured through flat
//! `name=value` maps. [`Properties`] keeps those maps ordered by name so that
//! rendered `.properties` files are stable between runs, and it offers
//! [`Properties::set_if_absent`], which is how every builder in this crate
//! injects its defaults without clobbering values the caller supplied.
//!
//! # Example
//! ```
//! use kafka_harness::properties::Properties;
//!
//! let mut props = Properties::new();
//! props.set("cleanup.policy", "compact");
//! props.set_if_absent("cleanup.policy", "delete");
//! props.set_if_absent("retention.ms", 60_000);
//!
//! assert_eq!(props.get("cleanup.policy"), Some("compact"));
//! assert_eq!(props.get("retention.ms"), Some("60000"));
//! ```

use crate::error::HarnessResult;
use java_properties::PropertiesWriter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// An ordered map from property name to its textual value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.0.insert(name.into(), value.to_string());
        self
    }

    /// Sets `name` to `value` only if no value is present yet.
    ///
    /// Returns `true` if the value was inserted.
    pub fn set_if_absent(&mut self, name: &str, value: impl ToString) -> bool {
        if self.0.contains_key(name) {
            return false;
        }
        self.0.insert(name.to_string(), value.to_string());
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Copies every entry of `other` into `self`; entries of `other` win.
    pub fn extend_from(&mut self, other: &Properties) {
        for (name, value) in other.iter() {
            self.0.insert(name.to_string(), value.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flattens the properties into a plain map for admin clients.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.0.clone().into_iter().collect()
    }

    /// Writes the properties in Java `.properties` format.
    pub fn store<W: Write>(&self, writer: W) -> HarnessResult<()> {
        let mut out = PropertiesWriter::new(writer);
        for (name, value) in self.iter() {
            out.write(name, value)?;
        }
        out.finish()?;
        Ok(())
    }

    /// Reads properties in Java `.properties` format.
    pub fn load<R: Read>(reader: R) -> HarnessResult<Self> {
        let map = java_properties::read(BufReader::new(reader))?;
        Ok(map.into_iter().collect())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> HarnessResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path.as_ref())?;
        self.store(BufWriter::new(file))
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> HarnessResult<Self> {
        Self::load(File::open(path.as_ref())?)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (name, value) in iter {
            props.set(name, value);
        }
        props
    }
}

impl From<HashMap<String, String>> for Properties {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
