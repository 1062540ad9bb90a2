pub mod extract;
pub mod render;

use crate::domain::model::{RawPageFragment, SectionBlock, SummaryDocument, TableLayout};
use crate::utils::error::{CruiseError, Result};
use extract::SectionExtractor;

/// Turns the results-container markup into the per-nights summary tables.
///
/// Pure and deterministic: the same fragment always renders the same document.
/// A section without a nights label is skipped and counted in
/// [`SummaryDocument::skipped_sections`]; every other section is rendered in
/// document order.
pub fn summarize(fragment: &RawPageFragment, layout: TableLayout) -> Result<SummaryDocument> {
    let extractor = SectionExtractor::new()?;
    let sections = extractor.sections(fragment.as_str());
    tracing::debug!("Found {} cruise item sections", sections.len());

    let mut document = SummaryDocument::default();
    for section in sections {
        let Some(heading) = section.nights_label else {
            let err = CruiseError::MissingLabel {
                section_index: section.index,
            };
            tracing::warn!("⚠️ Skipping section: {}", err);
            document.skipped_sections += 1;
            continue;
        };

        let html = render::render_section(&heading, &section.rows, layout);
        document.blocks.push(SectionBlock {
            heading,
            row_count: section.rows.len(),
            html,
        });
    }

    Ok(document)
}
