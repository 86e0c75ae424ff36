//! Produce item model and the per-vendor catalog

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::vendor::VendorSummary;

/// Produce item entity, owned by exactly one vendor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProduceItem {
    pub id: Uuid,
    pub name: String,
    pub rate: f64,
    pub area: String,
}

/// Validated fields for a new produce item
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduceItem {
    pub name: String,
    pub rate: f64,
    pub area: String,
}

/// Validated partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub rate: Option<f64>,
    pub area: Option<String>,
}

impl ItemPatch {
    /// Overwrite the provided fields of `item`
    pub fn apply(&self, item: &mut ProduceItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(rate) = self.rate {
            item.rate = rate;
        }
        if let Some(area) = &self.area {
            item.area = area.clone();
        }
    }
}

/// Raw item fields as submitted by a client.
///
/// `rate` stays untyped so numeric strings can be accepted and bad input
/// reported as a validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemInput {
    pub name: Option<String>,
    pub rate: Option<Value>,
    pub area: Option<String>,
}

/// Add item request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddItemRequest {
    pub phone: Option<String>,
    pub vegetable: Option<ItemInput>,
}

/// Update item request body
pub type UpdateItemRequest = ItemInput;

/// A produce item flattened out of its vendor's catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryItem {
    pub id: Uuid,
    pub name: String,
    pub rate: f64,
    pub area: String,
    pub vendor: VendorSummary,
}

impl DirectoryItem {
    pub fn new(item: &ProduceItem, vendor: VendorSummary) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            rate: item.rate,
            area: item.area.clone(),
            vendor,
        }
    }
}

/// Insertion-ordered collection of a vendor's produce items
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ProduceItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new item under a freshly generated identifier
    pub fn append(&mut self, item: NewProduceItem) -> ProduceItem {
        let item = ProduceItem {
            id: Uuid::new_v4(),
            name: item.name,
            rate: item.rate,
            area: item.area,
        };
        self.items.push(item.clone());
        item
    }

    /// Apply `patch` to the item with `id`, returning the updated item
    pub fn update(&mut self, id: Uuid, patch: &ItemPatch) -> Option<ProduceItem> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        patch.apply(item);
        Some(item.clone())
    }

    /// Remove the item with `id`; false when no such item exists
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[ProduceItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tomato() -> NewProduceItem {
        NewProduceItem {
            name: "Tomato".to_string(),
            rate: 20.0,
            area: "North".to_string(),
        }
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut catalog = Catalog::new();
        let first = catalog.append(tomato());
        let second = catalog.append(NewProduceItem {
            name: "Onion".to_string(),
            rate: 30.0,
            area: "South".to_string(),
        });

        assert_ne!(first.id, second.id);
        let names: Vec<_> = catalog.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Tomato", "Onion"]);
    }

    #[test]
    fn test_partial_update_only_touches_given_fields() {
        let mut catalog = Catalog::new();
        let item = catalog.append(tomato());

        let patch = ItemPatch {
            rate: Some(25.0),
            ..ItemPatch::default()
        };
        let updated = catalog.update(item.id, &patch).unwrap();

        assert_eq!(updated.name, "Tomato");
        assert_eq!(updated.area, "North");
        assert_eq!(updated.rate, 25.0);
        assert_eq!(catalog.items(), [updated]);
    }

    #[test]
    fn test_update_unknown_item_returns_none() {
        let mut catalog = Catalog::new();
        catalog.append(tomato());

        assert!(catalog.update(Uuid::new_v4(), &ItemPatch::default()).is_none());
    }

    #[test]
    fn test_remove_unknown_item_leaves_catalog_unchanged() {
        let mut catalog = Catalog::new();
        let item = catalog.append(tomato());

        assert!(!catalog.remove(Uuid::new_v4()));
        assert_eq!(catalog.items(), [item.clone()]);

        assert!(catalog.remove(item.id));
        assert!(catalog.items().is_empty());
    }
}
