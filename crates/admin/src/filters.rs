//! Custom Askama template filters for admin pages.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// CSS badge class for an application status.
///
/// Usage in templates: `{{ row.status|status_class }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn status_class(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(match value.to_string().as_str() {
        "new" => "badge badge-new",
        "processing" => "badge badge-processing",
        "completed" => "badge badge-done",
        _ => "badge",
    })
}
