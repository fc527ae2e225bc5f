use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::products::{NewProduct, Product, ProductChanges, normalize_slug};

pub use super::shared::{PaginationQuery, validate_pagination};
use super::shared::{double_option, validate_title};

/// Accepted values for `gender`.
pub const GENDERS: &[&str] = &["men", "women", "kid", "unisex"];

/// Request body for creating a product.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Men's Chill Crew Neck Sweatshirt")]
    pub title: String,
    /// Defaults to 0.
    #[schema(example = 75.0)]
    pub price: Option<f64>,
    pub description: Option<String>,
    /// Derived from the title when omitted.
    #[schema(example = "mens_chill_crew_neck_sweatshirt")]
    pub slug: Option<String>,
    /// Defaults to 0.
    #[schema(example = 7)]
    pub stock: Option<i32>,
    #[schema(example = json!(["S", "M", "L"]))]
    pub sizes: Vec<String>,
    #[schema(example = "men")]
    pub gender: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image URLs, in display order.
    #[serde(default)]
    #[schema(example = json!(["1740176-00-A_0_2000.jpg"]))]
    pub images: Vec<String>,
}

impl CreateProductRequest {
    /// Split into scalar attributes and the image list.
    pub fn into_parts(self) -> (NewProduct, Vec<String>) {
        let attributes = NewProduct {
            title: self.title.trim().to_string(),
            price: self.price.unwrap_or(0.0),
            description: self.description,
            slug: self.slug,
            stock: self.stock.unwrap_or(0),
            sizes: self.sizes,
            gender: self.gender,
            tags: self.tags,
        };
        (attributes, self.images)
    }
}

/// Request body for a partial product update.
///
/// Supplying `images` replaces the whole image list; omitting it keeps the
/// current images.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub slug: Option<String>,
    pub stock: Option<i32>,
    pub sizes: Option<Vec<String>>,
    pub gender: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl UpdateProductRequest {
    pub fn into_parts(self) -> (ProductChanges, Option<Vec<String>>) {
        let changes = ProductChanges {
            title: self.title.map(|t| t.trim().to_string()),
            price: self.price,
            description: self.description,
            slug: self.slug,
            stock: self.stock,
            sizes: self.sizes,
            gender: self.gender,
            tags: self.tags,
        };
        (changes, self.images)
    }
}

/// A product as returned by the API. Images are plain URLs.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductResponse {
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

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            title: p.title,
            price: p.price,
            description: p.description,
            slug: p.slug,
            stock: p.stock,
            sizes: p.sizes,
            gender: p.gender,
            tags: p.tags,
            images: p.images,
            user_id: p.user_id,
        }
    }
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation("Price must be a non-negative number".into()));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::Validation("Stock must be >= 0".into()));
    }
    Ok(())
}

/// Checks the slug as it will be stored, after normalization.
fn validate_slug(slug: &str) -> Result<(), AppError> {
    let normalized = normalize_slug(slug);
    if normalized.is_empty() || normalized.chars().count() > 256 {
        return Err(AppError::Validation("Slug must be 1-256 characters".into()));
    }
    Ok(())
}

fn validate_gender(gender: &str) -> Result<(), AppError> {
    if !GENDERS.contains(&gender) {
        return Err(AppError::Validation(format!(
            "Gender must be one of: {}",
            GENDERS.join(", ")
        )));
    }
    Ok(())
}

fn validate_sizes(sizes: &[String]) -> Result<(), AppError> {
    if sizes.is_empty() || sizes.iter().any(|s| s.trim().is_empty()) {
        return Err(AppError::Validation(
            "Sizes must be a non-empty list of non-empty strings".into(),
        ));
    }
    Ok(())
}

fn validate_strings(values: &[String], name: &str) -> Result<(), AppError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(AppError::Validation(format!("{name} must not contain empty strings")));
    }
    Ok(())
}

pub fn validate_create_product(req: &CreateProductRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(stock) = req.stock {
        validate_stock(stock)?;
    }
    // An omitted slug is derived from the title.
    validate_slug(req.slug.as_deref().unwrap_or(&req.title))?;
    validate_sizes(&req.sizes)?;
    validate_gender(&req.gender)?;
    validate_strings(&req.tags, "Tags")?;
    validate_strings(&req.images, "Images")?;
    Ok(())
}

pub fn validate_update_product(req: &UpdateProductRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(stock) = req.stock {
        validate_stock(stock)?;
    }
    if let Some(ref slug) = req.slug {
        validate_slug(slug)?;
    }
    if let Some(ref sizes) = req.sizes {
        validate_sizes(sizes)?;
    }
    if let Some(ref gender) = req.gender {
        validate_gender(gender)?;
    }
    if let Some(ref tags) = req.tags {
        validate_strings(tags, "Tags")?;
    }
    if let Some(ref images) = req.images {
        validate_strings(images, "Images")?;
    }
    Ok(())
}
