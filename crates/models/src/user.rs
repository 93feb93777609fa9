use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A registered account. `username` is the unique key; any other fields
/// supplied at registration are carried through verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub username: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
