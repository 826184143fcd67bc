//! Basket route handlers: listing and checkout.

use askama::Template;
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::auth::RequireAuth;
use crate::middleware::flash::{FlashLevel, push_flash, take_flash};
use crate::services::catalog::{CatalogService, CheckoutOutcome};
use crate::state::AppState;

use super::{FlashView, ProductView, UserView};

/// Build the basket router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/basket", get(basket))
        .route("/basket/checkout", post(checkout))
}

/// Basket listing template.
#[derive(Template)]
#[template(path = "basket.html")]
struct BasketTemplate {
    user: UserView,
    flashes: Vec<FlashView>,
    products: Vec<ProductView>,
    total: String,
}

/// Basket page with the running total.
///
/// GET /basket
#[instrument(skip(user, state, session))]
async fn basket(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let service = CatalogService::new(state.pool(), state.images());
    let (products, total) = service.list_basket().await?;

    let template = BasketTemplate {
        user: UserView::from(&user),
        flashes: take_flash(&session).await?.into_iter().map(Into::into).collect(),
        products: products.iter().map(ProductView::from).collect(),
        total: total.to_string(),
    };

    Ok(Html(template.render()?))
}

/// Clear the basket.
///
/// POST /basket/checkout
#[instrument(skip(state, session))]
async fn checkout(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let service = CatalogService::new(state.pool(), state.images());

    match service.checkout().await? {
        CheckoutOutcome::Cleared(count) => {
            push_flash(
                &session,
                FlashLevel::Success,
                format!("Order placed; {count} product(s) checked out."),
            )
            .await?;
        }
        CheckoutOutcome::AlreadyEmpty => {
            push_flash(&session, FlashLevel::Info, "The basket is already empty.").await?;
        }
    }

    Ok(Redirect::to("/basket").into_response())
}
