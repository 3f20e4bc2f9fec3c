//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;
use vitrine_core::{Application, ApplicationStatus};
use vitrine_data::{ApplicationRepository, Collection};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// How many recent applications the dashboard lists.
const RECENT_APPLICATIONS: usize = 5;

/// Collection counts shown as tiles.
#[derive(Debug, Clone, Default)]
pub struct DashboardCounts {
    pub products: usize,
    pub categories: usize,
    pub media: usize,
    pub applications: usize,
    pub new_applications: usize,
}

/// Recent application row.
#[derive(Debug, Clone)]
pub struct ApplicationRow {
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub status: &'static str,
    pub received: String,
}

impl From<&Application> for ApplicationRow {
    fn from(application: &Application) -> Self {
        Self {
            name: format!("{} {}", application.name, application.surname)
                .trim()
                .to_string(),
            phone_number: application.phone_number.clone(),
            email: application.email.clone(),
            status: application.status.as_str(),
            received: application.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin: CurrentAdmin,
    pub counts: DashboardCounts,
    pub recent: Vec<ApplicationRow>,
}

/// Display the dashboard.
///
/// GET /dashboard
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn dashboard(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let store = state.store();
    let applications = ApplicationRepository::new(store).list(None).await?;

    let counts = DashboardCounts {
        products: store.count(Collection::Products).await?,
        categories: store.count(Collection::Categories).await?,
        media: store.count(Collection::Media).await?,
        applications: applications.len(),
        new_applications: applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::New)
            .count(),
    };

    Ok(DashboardTemplate {
        admin,
        counts,
        recent: applications
            .iter()
            .take(RECENT_APPLICATIONS)
            .map(ApplicationRow::from)
            .collect(),
    })
}
