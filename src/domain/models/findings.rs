//! Analysis output: per-unit findings and the run-wide result table.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::unit::UnitKey;

/// Findings for one unit, keyed by scope name (class, method, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitFindings(BTreeMap<String, Vec<String>>);

impl UnitFindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(
        mut self,
        scope: impl Into<String>,
        findings: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.0
            .insert(scope.into(), findings.into_iter().map(Into::into).collect());
        self
    }

    pub fn scopes(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn scope_count(&self) -> usize {
        self.0.len()
    }

    pub fn finding_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for UnitFindings {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

/// Mapping from unit to its findings.
///
/// Iteration follows insertion order, which under concurrent scheduling is
/// completion order. Re-recording a key replaces its findings in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    entries: Vec<(UnitKey, UnitFindings)>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: UnitKey, findings: UnitFindings) {
        match self.entries.iter_mut().find(|(key, _)| *key == unit) {
            Some((_, existing)) => *existing = findings,
            None => self.entries.push((unit, findings)),
        }
    }

    pub fn get(&self, unit: &UnitKey) -> Option<&UnitFindings> {
        self.entries
            .iter()
            .find(|(key, _)| key == unit)
            .map(|(_, findings)| findings)
    }

    pub fn contains(&self, unit: &UnitKey) -> bool {
        self.get(unit).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &UnitKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitKey, &UnitFindings)> {
        self.entries.iter().map(|(key, findings)| (key, findings))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, findings) in &self.entries {
            map.serialize_entry(key, findings)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_completion_order() {
        let mut table = ResultTable::new();
        table.insert(UnitKey::new("C.java"), UnitFindings::new());
        table.insert(UnitKey::new("A.java"), UnitFindings::new());
        table.insert(UnitKey::new("B.java"), UnitFindings::new());

        let keys: Vec<&str> = table.keys().map(UnitKey::as_str).collect();
        assert_eq!(keys, vec!["C.java", "A.java", "B.java"]);
    }

    #[test]
    fn test_insert_overwrites_existing_key() {
        let mut table = ResultTable::new();
        table.insert(
            UnitKey::new("A.java"),
            UnitFindings::new().with_scope("A", ["God Class"]),
        );
        table.insert(UnitKey::new("B.java"), UnitFindings::new());
        table.insert(
            UnitKey::new("A.java"),
            UnitFindings::new().with_scope("A", ["Long Method", "Data Class"]),
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.keys().next().unwrap().as_str(), "A.java");
        assert_eq!(table.get(&UnitKey::new("A.java")).unwrap().finding_count(), 2);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let mut table = ResultTable::new();
        table.insert(
            UnitKey::new("Z.java"),
            UnitFindings::new().with_scope("Z.run", ["Long Method"]),
        );
        table.insert(UnitKey::new("A.java"), UnitFindings::new());

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Z.java":{"Z.run":["Long Method"]},"A.java":{}}"#);
    }

    #[test]
    fn test_findings_deserialize_from_scope_map() {
        let findings: UnitFindings =
            serde_json::from_str(r#"{"Foo": ["God Class"], "Foo.bar": []}"#).unwrap();
        assert_eq!(findings.scope_count(), 2);
        assert_eq!(findings.finding_count(), 1);
    }
}
