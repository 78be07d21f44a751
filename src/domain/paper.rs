//! Paper metadata as returned by the catalog search API.

use serde::{Deserialize, Serialize};
use url::Url;

use super::filename::pdf_name;

/// Record type marking a full conference paper in the catalog.
const FULL_PAPER_KIND: &str = "Conference and Workshop Papers";

/// Open-access preprint host whose documents we can fetch directly.
const PREPRINT_HOST: &str = "openreview.net";

/// One catalog record: title, record type and the external resource link.
///
/// Immutable; produced by enumeration and consumed by the download stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperMeta {
    /// Paper title as listed by the catalog.
    pub title: String,

    /// Record type tag (e.g. "Conference and Workshop Papers").
    pub kind: String,

    /// External resource link, usually the publisher's "view" page.
    pub link: String,
}

impl PaperMeta {
    /// Return the direct PDF URL if this record is downloadable.
    ///
    /// Only full conference papers hosted on the recognized preprint host are
    /// eligible; the host's "view" link is rewritten to its "document" form.
    pub fn preprint_pdf_url(&self) -> Option<String> {
        if self.kind != FULL_PAPER_KIND || self.link.is_empty() {
            return None;
        }

        let url = Url::parse(&self.link).ok()?;
        let host = url.host_str()?;
        if host != PREPRINT_HOST && !host.ends_with(&format!(".{}", PREPRINT_HOST)) {
            return None;
        }

        Some(self.link.replace("/forum?id=", "/pdf?id="))
    }

    /// Canonical artifact name of this paper's downloaded PDF.
    pub fn pdf_name(&self) -> String {
        pdf_name(&self.title)
    }
}
