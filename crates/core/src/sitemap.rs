//! XML sitemap with per-locale alternates.
//!
//! Each page is listed once at its canonical URL, with an `xhtml:link`
//! alternate for every locale (`?lang=<code>`) plus an `x-default` pointing at
//! the bare URL.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::types::Locale;

/// Pages that exist independently of catalog content.
pub const STATIC_PAGES: [&str; 4] = ["/", "/products", "/about", "/contact"];

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Path relative to the site root, starting with `/`.
    pub path: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl SitemapEntry {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            last_modified: None,
        }
    }

    /// Entry for a product detail page.
    #[must_use]
    pub fn product(id: &str, updated_at: DateTime<Utc>) -> Self {
        Self {
            path: format!("/products/{id}"),
            last_modified: Some(updated_at),
        }
    }
}

/// Static pages followed by `products`, in order.
#[must_use]
pub fn entries(products: impl IntoIterator<Item = SitemapEntry>) -> Vec<SitemapEntry> {
    STATIC_PAGES
        .iter()
        .map(|path| SitemapEntry::new(*path))
        .chain(products)
        .collect()
}

/// Render `entries` under `base_url` (no trailing slash).
#[must_use]
pub fn render(base_url: &str, entries: &[SitemapEntry]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );

    for entry in entries {
        let loc = escape(&format!("{base}{}", entry.path));
        let _ = writeln!(xml, "  <url>\n    <loc>{loc}</loc>");
        if let Some(modified) = entry.last_modified {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", modified.format("%Y-%m-%d"));
        }
        for locale in Locale::ALL {
            let _ = writeln!(
                xml,
                "    <xhtml:link rel=\"alternate\" hreflang=\"{code}\" href=\"{loc}?lang={code}\"/>",
                code = locale.code()
            );
        }
        let _ = writeln!(
            xml,
            "    <xhtml:link rel=\"alternate\" hreflang=\"x-default\" href=\"{loc}\"/>\n  </url>"
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_static_pages_come_first() {
        let list = entries([SitemapEntry::new("/products/p1")]);
        let paths: Vec<_> = list.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/products", "/about", "/contact", "/products/p1"]);
    }

    #[test]
    fn test_alternates_for_every_locale() {
        let updated = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let xml = render(
            "https://vitrine.example.uz/",
            &[SitemapEntry::product("abc", updated)],
        );

        assert!(xml.contains("<loc>https://vitrine.example.uz/products/abc</loc>"));
        assert!(xml.contains("<lastmod>2026-03-14</lastmod>"));
        for code in ["ru", "uz", "en"] {
            assert!(xml.contains(&format!(
                "hreflang=\"{code}\" href=\"https://vitrine.example.uz/products/abc?lang={code}\""
            )));
        }
        assert!(xml.contains(
            "hreflang=\"x-default\" href=\"https://vitrine.example.uz/products/abc\""
        ));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_escapes_paths() {
        let xml = render("https://x.uz", &[SitemapEntry::new("/a&b")]);
        assert!(xml.contains("<loc>https://x.uz/a&amp;b</loc>"));
    }
}
