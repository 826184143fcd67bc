//! Service-level tests for the catalog: add, move, delete, checkout,
//! pagination.

#![allow(clippy::unwrap_used)]

mod common;

use berrystand_core::{ProductId, ProductStatus};

use berrystand_admin::services::catalog::{
    CATALOG_PER_PAGE, CatalogError, CatalogService, CheckoutOutcome, MoveOutcome,
};

use common::{stored_file_count, test_images, test_pool, upload};

#[tokio::test]
async fn add_product_stores_comma_price_in_catalog() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    let product = service
        .add_product("Apples", "12,50", Some(upload("apples.jpg")))
        .await
        .unwrap();

    assert_eq!(product.name, "Apples");
    assert_eq!(product.price.to_string(), "12.50");
    assert_eq!(product.status, ProductStatus::Catalog);

    // The stored image is retrievable under the generated name
    assert_ne!(product.image_filename, "apples.jpg");
    assert!(images.upload_dir().join(&product.image_filename).exists());

    let (items, pagination) = service.list_catalog(1).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(pagination.total_items, 1);
}

#[tokio::test]
async fn add_product_strips_markup_from_name() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    let product = service
        .add_product("<b>Blueberries</b>", "4.00", Some(upload("blue.png")))
        .await
        .unwrap();

    assert_eq!(product.name, "Blueberries");
}

#[tokio::test]
async fn add_product_validation_failures_persist_nothing() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    // Name empty after markup stripping
    let err = service
        .add_product("<script>", "5.00", Some(upload("ok.png")))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(ref m) if m == "name required"));

    // Bad price
    let err = service
        .add_product("Cherries", "free", Some(upload("ok.png")))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(ref m) if m == "not a number"));

    // Non-positive price
    let err = service
        .add_product("Cherries", "0", Some(upload("ok.png")))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(ref m) if m == "must be positive"));

    // Price parsed fine, image rejected: still no row, no file
    let err = service
        .add_product("Cherries", "5.00", Some(upload("malware.exe")))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(ref m) if m == "unsupported type"));

    // Missing upload entirely
    let err = service.add_product("Cherries", "5.00", None).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation(ref m) if m == "image required"));

    let (items, pagination) = service.list_catalog(1).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(pagination.total_items, 0);
    assert_eq!(stored_file_count(&images), 0);
}

#[tokio::test]
async fn move_to_basket_shows_up_in_basket_with_total() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    let product = service
        .add_product("Raspberries", "8,40", Some(upload("rasp.webp")))
        .await
        .unwrap();

    let outcome = service.move_to_basket(product.id).await.unwrap();
    assert!(matches!(outcome, MoveOutcome::Moved(_)));

    let (basket, total) = service.list_basket().await.unwrap();
    assert_eq!(basket.len(), 1);
    assert_eq!(basket[0].id, product.id);
    assert_eq!(basket[0].status, ProductStatus::Basket);
    assert_eq!(total.to_string(), "8.40");

    // It left the catalog page
    let (catalog, _) = service.list_catalog(1).await.unwrap();
    assert!(catalog.is_empty());

    // Moving again is a notice, not an error, and changes nothing
    let outcome = service.move_to_basket(product.id).await.unwrap();
    assert!(matches!(outcome, MoveOutcome::AlreadyThere(_)));
    let (basket, _) = service.list_basket().await.unwrap();
    assert_eq!(basket.len(), 1);
}

#[tokio::test]
async fn return_to_catalog_round_trip_keeps_status_valid() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    let product = service
        .add_product("Currants", "3.10", Some(upload("currants.gif")))
        .await
        .unwrap();

    service.move_to_basket(product.id).await.unwrap();
    let outcome = service.return_to_catalog(product.id).await.unwrap();
    assert!(matches!(outcome, MoveOutcome::Moved(_)));

    let (catalog, _) = service.list_catalog(1).await.unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].status, ProductStatus::Catalog);

    // Returning again is the idempotent notice
    let outcome = service.return_to_catalog(product.id).await.unwrap();
    assert!(matches!(outcome, MoveOutcome::AlreadyThere(_)));
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    let missing = ProductId::new(4242);

    assert!(matches!(
        service.move_to_basket(missing).await,
        Err(CatalogError::NotFound)
    ));
    assert!(matches!(
        service.return_to_catalog(missing).await,
        Err(CatalogError::NotFound)
    ));
    assert!(matches!(
        service.delete_product(missing).await,
        Err(CatalogError::NotFound)
    ));
}

#[tokio::test]
async fn delete_product_removes_row_and_image() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    let product = service
        .add_product("Gooseberries", "6.00", Some(upload("goose.jpeg")))
        .await
        .unwrap();
    let image_path = images.upload_dir().join(&product.image_filename);
    assert!(image_path.exists());

    service.delete_product(product.id).await.unwrap();

    assert!(!image_path.exists());
    assert!(matches!(
        service.delete_product(product.id).await,
        Err(CatalogError::NotFound)
    ));
}

#[tokio::test]
async fn delete_survives_already_missing_image() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    let product = service
        .add_product("Mulberries", "9.99", Some(upload("mul.png")))
        .await
        .unwrap();

    // Someone removed the file out from under us
    std::fs::remove_file(images.upload_dir().join(&product.image_filename)).unwrap();

    service.delete_product(product.id).await.unwrap();

    let (items, _) = service.list_catalog(1).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn checkout_clears_basket_and_its_images() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    let kept = service
        .add_product("Keep me", "1.00", Some(upload("keep.png")))
        .await
        .unwrap();
    let first = service
        .add_product("Buy one", "2.00", Some(upload("one.png")))
        .await
        .unwrap();
    let second = service
        .add_product("Buy two", "3.00", Some(upload("two.png")))
        .await
        .unwrap();

    service.move_to_basket(first.id).await.unwrap();
    service.move_to_basket(second.id).await.unwrap();

    let outcome = service.checkout().await.unwrap();
    assert_eq!(outcome, CheckoutOutcome::Cleared(2));

    let (basket, total) = service.list_basket().await.unwrap();
    assert!(basket.is_empty());
    assert_eq!(total.to_string(), "0.00");

    // Basket images are gone; the catalog product keeps its file
    assert!(!images.upload_dir().join(&first.image_filename).exists());
    assert!(!images.upload_dir().join(&second.image_filename).exists());
    assert!(images.upload_dir().join(&kept.image_filename).exists());

    // Checking out an empty basket is a notice, not an error
    let outcome = service.checkout().await.unwrap();
    assert_eq!(outcome, CheckoutOutcome::AlreadyEmpty);
}

#[tokio::test]
async fn catalog_pagination_pages_and_clamps() {
    let pool = test_pool().await;
    let images = test_images().await;
    let service = CatalogService::new(&pool, &images);

    for i in 1..=12 {
        service
            .add_product(&format!("Product {i}"), "1.00", Some(upload("p.png")))
            .await
            .unwrap();
    }

    let (page_one, pagination) = service.list_catalog(1).await.unwrap();
    assert_eq!(page_one.len(), usize::try_from(CATALOG_PER_PAGE).unwrap());
    assert_eq!(pagination.total_items, 12);
    assert_eq!(pagination.total_pages, 2);
    assert!(!pagination.has_prev());
    assert!(pagination.has_next());

    // Newest first: the last product added leads the first page
    assert_eq!(page_one[0].name, "Product 12");

    let (page_two, pagination) = service.list_catalog(2).await.unwrap();
    assert_eq!(page_two.len(), 3);
    assert!(pagination.has_prev());
    assert!(!pagination.has_next());

    // Out-of-range pages are empty, not errors
    let (page_three, _) = service.list_catalog(3).await.unwrap();
    assert!(page_three.is_empty());

    // Page numbers clamp to 1
    let (clamped, pagination) = service.list_catalog(0).await.unwrap();
    assert_eq!(clamped.len(), page_one.len());
    assert_eq!(pagination.page, 1);
    let (clamped, _) = service.list_catalog(-5).await.unwrap();
    assert_eq!(clamped.len(), page_one.len());
}
