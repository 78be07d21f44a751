//! Deterministic artifact naming.
//!
//! Every stage derives its on-disk artifact name from the paper title, so
//! the same paper always maps to the same file across runs. That mapping is
//! what makes "output file already present" a valid completion signal.

/// Characters that are unsafe in filenames on at least one platform.
const RESERVED: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Replace reserved filename characters in a title with underscores.
///
/// Pure function: the same title always yields the same name.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect()
}

/// Artifact name for a paper's downloaded PDF.
pub fn pdf_name(title: &str) -> String {
    format!("{}.pdf", sanitize_title(title))
}

/// Artifact name for a paper's markdown (converted or summarized) document.
pub fn markdown_name(stem: &str) -> String {
    format!("{}.md", stem)
}
