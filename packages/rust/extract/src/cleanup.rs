//! Post-scan cleanup pipeline for extracted markup.
//!
//! Each cleanup pass is a function `&str -> String` applied in sequence,
//! once, after the whole document has been scanned.

use std::sync::LazyLock;

use regex::Regex;

use crate::ExtractOptions;

/// Run the full cleanup pipeline on the concatenated scanner output.
pub(crate) fn run_pipeline(html: &str, opts: &ExtractOptions) -> String {
    let mut result = collapse_blank_lines(html);
    result = remove_empty_paragraphs(&result);
    result = rewrite_asset_paths(&result, &opts.asset_placeholder, &opts.asset_base);
    result.trim().to_string()
}

// ---------------------------------------------------------------------------
// Pass 1: Collapse blank lines
// ---------------------------------------------------------------------------

/// Collapse any run of two or more blank lines into a single blank line.
fn collapse_blank_lines(html: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n+").expect("valid regex"));

    MULTI_BLANK_RE.replace_all(html, "\n\n").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Remove empty paragraphs
// ---------------------------------------------------------------------------

/// Drop `<p></p>` pairs holding nothing but whitespace.
fn remove_empty_paragraphs(html: &str) -> String {
    static EMPTY_P_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<p>\s*</p>").expect("valid regex"));

    EMPTY_P_RE.replace_all(html, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: Rewrite asset paths
// ---------------------------------------------------------------------------

fn rewrite_asset_paths(html: &str, placeholder: &str, asset_base: &str) -> String {
    if placeholder.is_empty() {
        return html.to_string();
    }
    html.replace(placeholder, asset_base)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
