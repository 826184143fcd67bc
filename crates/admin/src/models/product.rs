//! Product domain type.

use chrono::{DateTime, Utc};

use berrystand_core::{Price, ProductId, ProductStatus};

/// A catalog product.
///
/// `image_filename` is the stored (generated) name under the upload
/// directory and is non-empty for the lifetime of the record. Status moves
/// between catalog and basket only; deletion removes the row and the image.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name, markup-stripped on entry.
    pub name: String,
    /// Strictly positive price with two decimal places.
    pub price: Price,
    /// Stored image filename under the upload directory.
    pub image_filename: String,
    /// Catalog or basket.
    pub status: ProductStatus,
    /// When the product was added.
    pub created_at: DateTime<Utc>,
    /// When the product was last touched (status flips bump this).
    pub updated_at: DateTime<Utc>,
}
