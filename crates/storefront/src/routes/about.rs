//! About page: company blurb, certificates and partners.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;
use vitrine_core::MediaType;
use vitrine_data::MediaRepository;

use crate::error::{Localized, PageError};
use crate::filters;
use crate::middleware::Lang;
use crate::state::AppState;
use crate::views::{MediaView, PageContext};

#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
    pub certificates: Vec<MediaView>,
    pub partners: Vec<MediaView>,
}

#[instrument(skip(state), fields(locale = %locale))]
pub async fn about(
    State(state): State<AppState>,
    Lang(locale): Lang,
) -> Result<AboutTemplate, PageError> {
    let primary = state.primary_locale();
    let media = MediaRepository::new(state.store())
        .list(None)
        .await
        .localized(locale)?;

    let (certificates, partners): (Vec<_>, Vec<_>) = media
        .iter()
        .partition(|item| item.kind == MediaType::Certificate);
    let view = |items: Vec<&vitrine_core::Media>| {
        items
            .into_iter()
            .map(|item| MediaView::new(item, locale, primary))
            .collect()
    };

    Ok(AboutTemplate {
        page: PageContext::new(locale, "/about"),
        certificates: view(certificates),
        partners: view(partners),
    })
}
