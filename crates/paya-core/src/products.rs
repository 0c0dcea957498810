use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::documents::StoredFile;
use crate::listing::Identified;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    #[default]
    Active,
    Inactive,
    OutOfStock,
}

impl ProductStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::OutOfStock => "out_of_stock",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "draft" => Ok(ProductStatus::Draft),
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            "out_of_stock" => Ok(ProductStatus::OutOfStock),
            other => Err(format!(
                "unknown product status '{other}'; expected draft, active, inactive or out_of_stock"
            )),
        }
    }
}

/// Marketplace product categories. Anything the server adds later parses as
/// [`ProductCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    Electronics,
    Appliances,
    Clothing,
    Cosmetics,
    #[serde(rename = "Medical Care")]
    MedicalCare,
    Services,
    #[serde(other)]
    Other,
}

impl ProductCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductCategory::Electronics => "Electronics",
            ProductCategory::Appliances => "Appliances",
            ProductCategory::Clothing => "Clothing",
            ProductCategory::Cosmetics => "Cosmetics",
            ProductCategory::MedicalCare => "Medical Care",
            ProductCategory::Services => "Services",
            ProductCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electronics" => Ok(ProductCategory::Electronics),
            "appliances" => Ok(ProductCategory::Appliances),
            "clothing" => Ok(ProductCategory::Clothing),
            "cosmetics" => Ok(ProductCategory::Cosmetics),
            "medical care" | "medical-care" | "medical_care" => Ok(ProductCategory::MedicalCare),
            "services" => Ok(ProductCategory::Services),
            "other" => Ok(ProductCategory::Other),
            other => Err(format!("unknown product category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default)]
    pub quantity: u32,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,
}

fn default_low_stock_threshold() -> u32 {
    5
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            quantity: 0,
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

/// A product listed by the merchant, as returned by the products endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Prices arrive as JSON numbers in KES.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<StoredFile>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "KES".to_string()
}

impl Product {
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.inventory.quantity <= self.inventory.low_stock_threshold
    }
}

impl Identified for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of a create or update request. The CLI reads it from a JSON file, so
/// it deserializes with the same camelCase names it serializes with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: ProductCategory,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ProductInput {
    /// Checks the constraints the server enforces before a request is sent:
    /// a non-empty name and description and a non-negative price.
    ///
    /// # Errors
    ///
    /// Returns the list of human-readable problems when any check fails.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        } else if self.name.chars().count() > 200 {
            problems.push("name cannot exceed 200 characters".to_string());
        }
        if self.description.trim().is_empty() {
            problems.push("description is required".to_string());
        }
        if self.price.is_sign_negative() {
            problems.push("price cannot be negative".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}
