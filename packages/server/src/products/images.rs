use sea_orm::{NotSet, Set};
use uuid::Uuid;

use crate::entity::product_image;

/// Build one owned image row per URL, scoped to `product_id`.
///
/// Positions follow the order of `urls` so the list can be read back as given.
pub fn build_images(product_id: Uuid, urls: &[String]) -> Vec<product_image::ActiveModel> {
    urls.iter()
        .enumerate()
        .map(|(position, url)| product_image::ActiveModel {
            id: NotSet,
            url: Set(url.clone()),
            position: Set(position as i32),
            product_id: Set(product_id),
        })
        .collect()
}

/// Reduce image rows to their URLs, ordered by position.
pub fn flatten(mut images: Vec<product_image::Model>) -> Vec<String> {
    images.sort_by_key(|image| (image.position, image.id));
    images.into_iter().map(|image| image.url).collect()
}
