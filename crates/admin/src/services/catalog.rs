//! Catalog service: listing, adding, basket moves, deletion, checkout.
//!
//! This is the only place that mutates product status or deletes products;
//! route handlers call in here and never touch the repository directly.
//! Authentication is enforced upstream by the extractor, not here.

use sqlx::SqlitePool;
use thiserror::Error;

use berrystand_core::{Price, ProductId, ProductStatus};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

use super::images::{ImageError, ImageStore, ImageUpload};

/// Products shown per catalog page.
pub const CATALOG_PER_PAGE: i64 = 9;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad user input (name, price, or image).
    #[error("{0}")]
    Validation(String),

    /// Referenced product does not exist.
    #[error("product not found")]
    NotFound,

    /// Filesystem failure while storing an image.
    #[error("storage error: {0}")]
    Storage(#[source] std::io::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<berrystand_core::PriceError> for CatalogError {
    fn from(err: berrystand_core::PriceError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ImageError> for CatalogError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::Missing | ImageError::UnsupportedType => {
                Self::Validation(err.to_string())
            }
            ImageError::Io(io) => Self::Storage(io),
        }
    }
}

/// Page metadata for the catalog listing.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Current 1-based page number (already clamped).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total catalog products.
    pub total_items: i64,
    /// Total pages (0 when the catalog is empty).
    pub total_pages: i64,
}

impl Pagination {
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Result of a basket move; the caller turns `AlreadyThere` into a notice.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The status was flipped.
    Moved(Product),
    /// The product was already in the requested status; nothing changed.
    AlreadyThere(Product),
}

impl MoveOutcome {
    /// The product involved, whichever way the move went.
    #[must_use]
    pub const fn product(&self) -> &Product {
        match self {
            Self::Moved(p) | Self::AlreadyThere(p) => p,
        }
    }
}

/// Result of a checkout.
#[derive(Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// This many basket products were removed.
    Cleared(usize),
    /// The basket was already empty; nothing changed.
    AlreadyEmpty,
}

/// Orchestrates product lifecycle over the repository and image store.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    images: &'a ImageStore,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, images: &'a ImageStore) -> Self {
        Self {
            products: ProductRepository::new(pool),
            images,
        }
    }

    /// List one page of the catalog, newest first.
    ///
    /// Page numbers are 1-based and clamped to at least 1; pages past the
    /// end yield an empty item set rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the queries fail.
    pub async fn list_catalog(&self, page: i64) -> Result<(Vec<Product>, Pagination), CatalogError> {
        let page = page.max(1);
        let offset = (page - 1) * CATALOG_PER_PAGE;

        let total_items = self.products.count_by_status(ProductStatus::Catalog).await?;
        let items = self.products.list_catalog_page(CATALOG_PER_PAGE, offset).await?;

        let pagination = Pagination {
            page,
            per_page: CATALOG_PER_PAGE,
            total_items,
            total_pages: (total_items + CATALOG_PER_PAGE - 1) / CATALOG_PER_PAGE,
        };

        Ok((items, pagination))
    }

    /// List the basket, most recently touched first, with the price total.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_basket(&self) -> Result<(Vec<Product>, Price), CatalogError> {
        let items = self.products.list_basket().await?;
        let total = items.iter().map(|p| p.price).sum();
        Ok((items, total))
    }

    /// Validate inputs and create a catalog product.
    ///
    /// Validation runs before anything is persisted: a bad name or price
    /// means no file is written, and a bad image means no row is inserted.
    /// If the insert itself fails the just-written file is removed again.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for bad input, `Storage` for
    /// filesystem failures, `Repository` for database failures.
    pub async fn add_product(
        &self,
        raw_name: &str,
        raw_price: &str,
        upload: Option<ImageUpload>,
    ) -> Result<Product, CatalogError> {
        let name = strip_markup(raw_name);
        if name.is_empty() {
            return Err(CatalogError::Validation("name required".to_owned()));
        }

        let price = Price::parse(raw_price)?;

        let upload = upload.ok_or_else(|| CatalogError::Validation("image required".to_owned()))?;
        let stored = self.images.save(&upload).await?;

        match self.products.create(&name, price, &stored).await {
            Ok(product) => Ok(product),
            Err(e) => {
                // The row never landed; don't leave the file behind.
                if let Err(cleanup) = self.images.delete(&stored).await {
                    tracing::warn!(error = %cleanup, filename = %stored, "failed to clean up image after insert error");
                }
                Err(e.into())
            }
        }
    }

    /// Move a product into the basket.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn move_to_basket(&self, id: ProductId) -> Result<MoveOutcome, CatalogError> {
        self.set_status(id, ProductStatus::Basket).await
    }

    /// Return a product from the basket to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn return_to_catalog(&self, id: ProductId) -> Result<MoveOutcome, CatalogError> {
        self.set_status(id, ProductStatus::Catalog).await
    }

    async fn set_status(
        &self,
        id: ProductId,
        target: ProductStatus,
    ) -> Result<MoveOutcome, CatalogError> {
        let product = self
            .products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        if product.status == target {
            return Ok(MoveOutcome::AlreadyThere(product));
        }

        match self.products.set_status(id, target).await {
            Ok(()) => Ok(MoveOutcome::Moved(Product {
                status: target,
                ..product
            })),
            // Deleted between the read and the update.
            Err(RepositoryError::NotFound) => Err(CatalogError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a product and its image file.
    ///
    /// The image removal is attempted first and is best-effort: a missing
    /// file, or any filesystem failure, never blocks removing the row.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let product = self
            .products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        self.delete_image_best_effort(&product).await;

        match self.products.delete(id).await {
            Ok(()) => Ok(product),
            Err(RepositoryError::NotFound) => Err(CatalogError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Clear the basket: delete every basket product and its image.
    ///
    /// Not atomic across partial filesystem failure; rows already deleted
    /// stay deleted and image errors are logged and swallowed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if a row deletion fails.
    pub async fn checkout(&self) -> Result<CheckoutOutcome, CatalogError> {
        let basket = self.products.list_basket().await?;
        if basket.is_empty() {
            return Ok(CheckoutOutcome::AlreadyEmpty);
        }

        let mut cleared = 0;
        for product in basket {
            self.delete_image_best_effort(&product).await;

            match self.products.delete(product.id).await {
                Ok(()) => cleared += 1,
                // Already gone (raced with an individual delete): fine.
                Err(RepositoryError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(CheckoutOutcome::Cleared(cleared))
    }

    async fn delete_image_best_effort(&self, product: &Product) {
        if let Err(e) = self.images.delete(&product.image_filename).await {
            tracing::warn!(
                error = %e,
                product_id = %product.id,
                filename = %product.image_filename,
                "failed to delete product image; leaving file behind"
            );
        }
    }
}

/// Strip markup from a user-entered name: tags are removed, their text
/// content kept, and the result trimmed. Output encoding is the template
/// engine's job; this keeps angle-bracket soup out of the data.
fn strip_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_plain_text() {
        assert_eq!(strip_markup("  Apples "), "Apples");
    }

    #[test]
    fn test_strip_markup_removes_tags() {
        assert_eq!(strip_markup("<b>Apples</b>"), "Apples");
        assert_eq!(strip_markup("Straw<i>berries"), "Strawberries");
    }

    #[test]
    fn test_strip_markup_tag_only_input_is_empty() {
        assert_eq!(strip_markup("<script>"), "");
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination {
            page: 1,
            per_page: CATALOG_PER_PAGE,
            total_items: 12,
            total_pages: 2,
        };
        assert!(!p.has_prev());
        assert!(p.has_next());

        let last = Pagination { page: 2, ..p };
        assert!(last.has_prev());
        assert!(!last.has_next());
    }
}
