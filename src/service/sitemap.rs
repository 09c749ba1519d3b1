//! XML sitemap for the public site

use std::fmt::Write;

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use crate::model::Document;

/// Static pages listed ahead of the documents: (path, priority)
const STATIC_PAGES: [(&str, f32); 3] = [("", 1.0), ("/about", 0.8), ("/contact", 0.5)];

const DOCUMENT_PRIORITY: f32 = 0.5;
const CHANGE_FREQUENCY: &str = "daily";

/// Path of a document's summary page
pub fn document_path(slug: &str) -> String {
    format!("/eo-summary/{}", slug)
}

/// Render the sitemap for `site_url` (no trailing slash).
///
/// Static pages carry `generated_at` as their last modification; documents
/// carry their own `updated_at`.
pub fn render_sitemap(
    site_url: &str,
    documents: &[Document],
    generated_at: DateTime<Utc>,
) -> Result<String, std::fmt::Error> {
    let mut xml = String::new();

    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        xml,
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#
    )?;

    for (path, priority) in STATIC_PAGES {
        write_url(&mut xml, &format!("{}{}", site_url, path), generated_at, priority)?;
    }

    for doc in documents {
        write_url(
            &mut xml,
            &format!("{}{}", site_url, document_path(&doc.slug)),
            doc.updated_at,
            DOCUMENT_PRIORITY,
        )?;
    }

    writeln!(xml, "</urlset>")?;
    Ok(xml)
}

fn write_url(
    xml: &mut String,
    loc: &str,
    last_modified: DateTime<Utc>,
    priority: f32,
) -> std::fmt::Result {
    writeln!(xml, "  <url>")?;
    writeln!(xml, "    <loc>{}</loc>", escape(loc))?;
    writeln!(xml, "    <lastmod>{}</lastmod>", last_modified.to_rfc3339())?;
    writeln!(xml, "    <changefreq>{}</changefreq>", CHANGE_FREQUENCY)?;
    writeln!(xml, "    <priority>{:.1}</priority>", priority)?;
    writeln!(xml, "  </url>")
}
