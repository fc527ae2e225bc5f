//! Product aggregate persistence.
//!
//! A product owns an ordered list of image rows. Callers only ever see the
//! flattened [`Product`], where images are plain URL strings.

mod error;
pub mod images;
mod service;

use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

use crate::entity::{product, product_image};

pub use error::{INTERNAL_MESSAGE, ServiceError, StorageErrorExt};
pub use service::ProductService;

/// Scalar attributes for a new product. Shapes are validated by the caller.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: String,
    pub tags: Vec<String>,
}

/// Partial update. `None` keeps the persisted value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<Option<String>>,
    pub slug: Option<String>,
    pub stock: Option<i32>,
    pub sizes: Option<Vec<String>>,
    pub gender: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl ProductChanges {
    /// Merge onto a preloaded row.
    pub(crate) fn apply(self, active: &mut product::ActiveModel) {
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(price) = self.price {
            active.price = Set(price);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(slug) = self.slug {
            active.slug = Set(normalize_slug(&slug));
        }
        if let Some(stock) = self.stock {
            active.stock = Set(stock);
        }
        if let Some(sizes) = self.sizes {
            active.sizes = Set(sizes.into());
        }
        if let Some(gender) = self.gender {
            active.gender = Set(gender);
        }
        if let Some(tags) = self.tags {
            active.tags = Set(tags.into());
        }
    }
}

/// A product with its images reduced to URLs, in list order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub user_id: Option<Uuid>,
}

impl Product {
    fn from_parts(model: product::Model, images: Vec<String>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            price: model.price,
            description: model.description,
            slug: model.slug,
            stock: model.stock,
            sizes: model.sizes.into(),
            gender: model.gender,
            tags: model.tags.into(),
            images,
            user_id: model.user_id,
        }
    }
}

/// A product row together with its owned image rows.
#[derive(Debug, Clone)]
pub struct ProductWithImages {
    pub product: product::Model,
    pub images: Vec<product_image::Model>,
}

impl ProductWithImages {
    pub fn flatten(self) -> Product {
        Product::from_parts(self.product, images::flatten(self.images))
    }
}

/// Parse `term` as a surrogate id only in the hyphenated 8-4-4-4-12 form.
///
/// Simple, braced and URN spellings are treated as natural keys.
pub fn parse_product_id(term: &str) -> Option<Uuid> {
    if term.len() != 36 {
        return None;
    }
    Uuid::try_parse(term).ok()
}

/// Lowercase, spaces to underscores, apostrophes dropped.
pub fn normalize_slug(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace('\'', "")
}
