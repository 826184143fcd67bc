//! Catalog route handlers: listing, adding, moving, deleting products.

use askama::Template;
use axum::{
    Router,
    extract::{Multipart, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use berrystand_core::ProductId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::auth::RequireAuth;
use crate::middleware::flash::{FlashLevel, push_flash, take_flash};
use crate::services::catalog::{CatalogError, CatalogService, MoveOutcome};
use crate::services::images::ImageUpload;
use crate::state::AppState;

use super::{FlashView, ProductView, UserView, redirect_target};

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/product/add", get(add_product_page).post(add_product_submit))
        .route("/product/{id}/add-to-basket", post(move_to_basket))
        .route("/product/{id}/return-to-catalog", post(return_to_catalog))
        .route("/product/{id}/delete", post(delete_product))
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// Pager view for the catalog template.
#[derive(Debug, Clone)]
pub struct PagerView {
    pub current: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev: i64,
    pub next: i64,
}

/// Catalog listing template.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    user: UserView,
    flashes: Vec<FlashView>,
    current_path: String,
    products: Vec<ProductView>,
    pagination: PagerView,
}

/// Add-product form template.
#[derive(Template)]
#[template(path = "add_product.html")]
struct AddProductTemplate {
    user: UserView,
    flashes: Vec<FlashView>,
    error: String,
    form_name: String,
    form_price: String,
}

/// Catalog listing page.
///
/// GET /?page=N
#[instrument(skip(user, state, session))]
async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let service = CatalogService::new(state.pool(), state.images());
    let page = query.page.unwrap_or(1);
    let (products, pagination) = service.list_catalog(page).await?;

    let current_path = if pagination.page > 1 {
        format!("/?page={}", pagination.page)
    } else {
        "/".to_string()
    };

    let template = IndexTemplate {
        user: UserView::from(&user),
        flashes: take_flash(&session).await?.into_iter().map(Into::into).collect(),
        current_path,
        products: products.iter().map(ProductView::from).collect(),
        pagination: PagerView {
            current: pagination.page,
            total_pages: pagination.total_pages,
            has_prev: pagination.has_prev(),
            has_next: pagination.has_next(),
            prev: pagination.page - 1,
            next: pagination.page + 1,
        },
    };

    Ok(Html(template.render()?))
}

/// Add-product form.
///
/// GET /product/add
async fn add_product_page(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Html<String>, AppError> {
    let template = AddProductTemplate {
        user: UserView::from(&user),
        flashes: take_flash(&session).await?.into_iter().map(Into::into).collect(),
        error: String::new(),
        form_name: String::new(),
        form_price: String::new(),
    };

    Ok(Html(template.render()?))
}

/// Create a product from the multipart form.
///
/// POST /product/add
#[instrument(skip(user, state, session, multipart))]
async fn add_product_submit(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut name = String::new();
    let mut price = String::new();
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("name") => {
                name = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            Some("price") => {
                price = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            Some("image") => {
                let file_name = field.file_name().map(ToOwned::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                upload = Some(ImageUpload { file_name, bytes });
            }
            _ => {}
        }
    }

    let service = CatalogService::new(state.pool(), state.images());

    match service.add_product(&name, &price, upload).await {
        Ok(product) => {
            push_flash(
                &session,
                FlashLevel::Success,
                format!("\"{}\" added to the catalog.", product.name),
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(CatalogError::Validation(message)) => {
            // Re-render the form with the message and the submitted values.
            let template = AddProductTemplate {
                user: UserView::from(&user),
                flashes: Vec::new(),
                error: message,
                form_name: name,
                form_price: price,
            };
            Ok(Html(template.render()?).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Hidden redirect field posted by action forms.
#[derive(Debug, Deserialize)]
pub struct ActionForm {
    pub redirect: Option<String>,
}

/// Move a product into the basket.
///
/// POST /product/{id}/add-to-basket
#[instrument(skip(state, session, form))]
async fn move_to_basket(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    axum::Form(form): axum::Form<ActionForm>,
) -> Result<Response, AppError> {
    let service = CatalogService::new(state.pool(), state.images());
    let target = redirect_target(form.redirect.as_deref(), "/");

    match service.move_to_basket(ProductId::new(id)).await? {
        MoveOutcome::Moved(product) => {
            push_flash(
                &session,
                FlashLevel::Success,
                format!("\"{}\" moved to the basket.", product.name),
            )
            .await?;
        }
        MoveOutcome::AlreadyThere(_) => {
            push_flash(&session, FlashLevel::Info, "Product is already in the basket.").await?;
        }
    }

    Ok(Redirect::to(&target).into_response())
}

/// Return a product from the basket to the catalog.
///
/// POST /product/{id}/return-to-catalog
#[instrument(skip(state, session, form))]
async fn return_to_catalog(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    axum::Form(form): axum::Form<ActionForm>,
) -> Result<Response, AppError> {
    let service = CatalogService::new(state.pool(), state.images());
    let target = redirect_target(form.redirect.as_deref(), "/basket");

    match service.return_to_catalog(ProductId::new(id)).await? {
        MoveOutcome::Moved(product) => {
            push_flash(
                &session,
                FlashLevel::Success,
                format!("\"{}\" is back on the catalog page.", product.name),
            )
            .await?;
        }
        MoveOutcome::AlreadyThere(_) => {
            push_flash(&session, FlashLevel::Info, "Product is already in the catalog.").await?;
        }
    }

    Ok(Redirect::to(&target).into_response())
}

/// Delete a product and its image.
///
/// POST /product/{id}/delete
#[instrument(skip(state, session, form))]
async fn delete_product(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    axum::Form(form): axum::Form<ActionForm>,
) -> Result<Response, AppError> {
    let service = CatalogService::new(state.pool(), state.images());
    let target = redirect_target(form.redirect.as_deref(), "/");

    let product = service.delete_product(ProductId::new(id)).await?;

    push_flash(
        &session,
        FlashLevel::Success,
        format!("\"{}\" removed.", product.name),
    )
    .await?;

    Ok(Redirect::to(&target).into_response())
}
