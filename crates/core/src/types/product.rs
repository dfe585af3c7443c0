//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A smartphone listed in the catalog.
///
/// Products are read-only reference data: the catalog service loads them from
/// a JSON file and clients only ever replace their copy wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub img_url: String,
    pub description: String,
    pub category: String,
    pub storage: String,
    pub camera: String,
    pub battery: String,
}
