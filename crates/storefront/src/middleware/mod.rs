//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. Security headers (CSP, frame options, etc.)
//! 5. Locale (resolve and persist the visitor's language)
//! 6. Rate limiting on the contact form only (governor)

pub mod locale;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use locale::{Lang, RequestLocale, locale_middleware};
pub use rate_limit::contact_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
