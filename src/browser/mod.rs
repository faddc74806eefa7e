use anyhow::{Context, Result};

use crate::catalog::{EvidenceIndex, EvidenceLink};

/// Pick the `n`-th (1-based) citation of a product's evidence for one subcriterion.
pub fn find_citation<'a>(
    index: &EvidenceIndex<'a>,
    product_id: &str,
    subcriterion_id: &str,
    n: usize,
) -> Result<&'a EvidenceLink> {
    let record = index.get(product_id, subcriterion_id).with_context(|| {
        format!(
            "No evidence recorded for product '{}' on '{}'",
            product_id, subcriterion_id
        )
    })?;
    if record.evidenz_links.is_empty() {
        anyhow::bail!(
            "Evidence for product '{}' on '{}' has no citations",
            product_id,
            subcriterion_id
        );
    }
    n.checked_sub(1)
        .and_then(|i| record.evidenz_links.get(i))
        .with_context(|| {
            format!(
                "Citation {} out of range (1-{})",
                n,
                record.evidenz_links.len()
            )
        })
}

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if the URL is not http(s) or the browser cannot be opened
pub fn open_url(url: &str) -> Result<()> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        anyhow::bail!("Refusing to open non-web URL: {}", url);
    }
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
