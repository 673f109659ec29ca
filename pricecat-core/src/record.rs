use serde::{Deserialize, Deserializer, Serialize};

use crate::range::CandidateId;

/// A validated product: an id with a non-empty name and a positive price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: CandidateId,
    pub name: String,
    #[serde(deserialize_with = "price_from_number_or_text")]
    pub price: u64,
}

/// Older snapshots stored the price as the raw response text ("1000").
fn price_from_number_or_text<'de, D: Deserializer<'de>>(de: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(de)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("price is not an integer: {s:?}"))),
    }
}

impl CatalogRecord {
    /// Build a record, trimming the name. Returns `None` when the name is
    /// blank or the price is zero.
    pub fn new(id: CandidateId, name: impl Into<String>, price: u64) -> Option<Self> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() || price == 0 {
            return None;
        }
        Some(Self {
            id,
            name: name.to_string(),
            price,
        })
    }

    /// Whether the record satisfies the catalog invariant. Records read back
    /// from disk bypass [`CatalogRecord::new`] and must be checked.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && self.price > 0
    }
}

/// Ordered set of catalog records with unique ids.
///
/// Iteration order is insertion order, which for a validation run is
/// validation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Returns `false` and leaves the catalog unchanged if
    /// the id is already present.
    pub fn insert(&mut self, record: CatalogRecord) -> bool {
        if self.contains(record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: CandidateId) -> Option<&CatalogRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<CatalogRecord> {
        self.records
    }
}

impl FromIterator<CatalogRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogRecord;
    type IntoIter = std::slice::Iter<'a, CatalogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_name_and_zero_price() {
        assert!(CatalogRecord::new(1, "   ", 100).is_none());
        assert!(CatalogRecord::new(1, "Apple", 0).is_none());
        let r = CatalogRecord::new(1, "  Apple ", 100).unwrap();
        assert_eq!(r.name, "Apple");
    }

    #[test]
    fn catalog_keeps_first_of_duplicate_ids() {
        let mut catalog = Catalog::new();
        assert!(catalog.insert(CatalogRecord::new(5, "Pear", 10).unwrap()));
        assert!(!catalog.insert(CatalogRecord::new(5, "Other", 20).unwrap()));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(5).unwrap().name, "Pear");
    }

    #[test]
    fn catalog_preserves_insertion_order() {
        let catalog: Catalog = [3, 1, 2]
            .into_iter()
            .map(|id| CatalogRecord::new(id, "x", 1).unwrap())
            .collect();
        let ids: Vec<_> = catalog.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
