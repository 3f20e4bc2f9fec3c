//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;
use vitrine_core::MediaType;
use vitrine_data::{MediaRepository, ProductRepository};

use crate::error::{Localized, PageError};
use crate::filters;
use crate::middleware::Lang;
use crate::state::AppState;
use crate::views::{MediaView, PageContext, ProductCard};

/// Number of products in the "new in the catalog" strip.
const LATEST_PRODUCTS: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub latest: Vec<ProductCard>,
    pub partners: Vec<MediaView>,
}

/// Display the home page.
#[instrument(skip(state), fields(locale = %locale))]
pub async fn home(
    State(state): State<AppState>,
    Lang(locale): Lang,
) -> Result<HomeTemplate, PageError> {
    let primary = state.primary_locale();

    let products = ProductRepository::new(state.store())
        .list()
        .await
        .localized(locale)?;
    let partners = MediaRepository::new(state.store())
        .list(Some(MediaType::Partner))
        .await
        .localized(locale)?;

    Ok(HomeTemplate {
        page: PageContext::new(locale, "/"),
        latest: products
            .iter()
            .take(LATEST_PRODUCTS)
            .map(|product| ProductCard::new(product, locale, primary))
            .collect(),
        partners: partners
            .iter()
            .map(|media| MediaView::new(media, locale, primary))
            .collect(),
    })
}
