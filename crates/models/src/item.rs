use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog item. `id` is server-assigned and unique; every other field
/// (including `name` and `price`) is an arbitrary JSON value supplied by
/// the admin and stored as-is.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Fields for a new or updated item, as sent by the client. A client-supplied
/// `id` is captured by the flatten map and discarded on apply; ids are only
/// ever assigned by the store.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ItemFields {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Build an item from client fields with a store-assigned id.
    pub fn from_fields(id: u64, fields: ItemFields) -> Self {
        let mut fields = fields.fields;
        fields.remove("id");
        Self { id, fields }
    }

    /// Shallow merge: supplied fields overwrite, everything else is retained.
    pub fn merge(&mut self, patch: ItemFields) {
        for (key, value) in patch.fields {
            if key == "id" {
                continue;
            }
            self.fields.insert(key, value);
        }
    }

    /// The reduced view exposed to non-admin readers: id plus `name` and
    /// `price` when present, never any other stored field.
    pub fn public_view(&self) -> Value {
        let mut view = Map::new();
        view.insert("id".into(), Value::from(self.id));
        for key in ["name", "price"] {
            if let Some(value) = self.fields.get(key) {
                view.insert(key.into(), value.clone());
            }
        }
        Value::Object(view)
    }
}
