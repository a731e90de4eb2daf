//! Body-content extraction for exported LMS wiki pages.
//!
//! Scans a page with a callback-driven tokenizer, keeps only the markup
//! between `<body>` and `</body>`, drops lecture-recording links and
//! timestamp lines, then runs a short cleanup pipeline (blank lines, empty
//! paragraphs, asset placeholder rewriting).

mod cleanup;
mod scanner;

use coursemigrate_shared::FiltersConfig;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Filters applied while extracting a page.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Links whose `href` contains any of these are dropped; so is any text mentioning them.
    pub video_markers: Vec<String>,
    /// Text segments containing any of these are dropped.
    pub timestamp_markers: Vec<String>,
    /// Literal token standing for the export's file store.
    pub asset_placeholder: String,
    /// What `asset_placeholder` is rewritten to.
    pub asset_base: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&FiltersConfig::default())
    }
}

impl From<&FiltersConfig> for ExtractOptions {
    fn from(filters: &FiltersConfig) -> Self {
        Self {
            video_markers: non_empty(&filters.video_markers),
            timestamp_markers: non_empty(&filters.timestamp_markers),
            asset_placeholder: filters.asset_placeholder.clone(),
            asset_base: filters.asset_base.clone(),
        }
    }
}

impl ExtractOptions {
    pub(crate) fn is_video_url(&self, href: &str) -> bool {
        self.video_markers.iter().any(|m| href.contains(m.as_str()))
    }

    pub(crate) fn is_filtered_text(&self, text: &str) -> bool {
        self.timestamp_markers
            .iter()
            .chain(&self.video_markers)
            .any(|m| text.contains(m.as_str()))
    }
}

/// An empty marker would match every string.
fn non_empty(markers: &[String]) -> Vec<String> {
    markers.iter().filter(|m| !m.is_empty()).cloned().collect()
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Extract the cleaned interior of a page's `<body>`.
///
/// Never fails: malformed markup yields partial output. An empty string means
/// there was nothing in the body worth keeping (or no body at all).
#[instrument(skip_all, fields(input_len = html.len()))]
pub fn extract(html: &str, opts: &ExtractOptions) -> String {
    let state = scanner::scan(html, opts);
    let raw = state.fragments.concat();

    debug!(
        fragments = state.fragments.len(),
        raw_len = raw.len(),
        "body scan complete"
    );

    let cleaned = cleanup::run_pipeline(&raw, opts);
    debug!(final_len = cleaned.len(), "extraction complete");
    cleaned
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
