use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Product;

/// Optional substring filters for the public catalog.
#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    #[serde(alias = "categoria")]
    pub category: Option<String>,
    #[serde(alias = "marca")]
    pub brand: Option<String>,
    #[serde(alias = "modelo")]
    pub model: Option<String>,
}

impl ProductFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn brand(brand: impl Into<String>) -> Self {
        Self {
            brand: Some(brand.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub code: String,
    pub name: String,
    pub brand: String,
    pub compatible_models: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub description: Option<String>,
    pub warranty: Option<String>,
    pub category: String,
    pub serial_number: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub compatible_models: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub warranty: Option<String>,
    pub category: Option<String>,
    pub serial_number: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct LowStockQuery {
    /// Stock at or below this value counts as low; defaults to the configured threshold.
    #[serde(alias = "limite")]
    pub limit: Option<i32>,
}
