use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{default_extraction_path, report_extraction};
use crate::engine::{extract, inspect, ExtractionRequest};
use crate::page_range::{parse_page_spec, SpecFormat};
use crate::pdf::{LopdfCodec, PageCodec};

pub fn run(
    input: &Path,
    pages: &str,
    format: SpecFormat,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let codec = LopdfCodec;
    let (_, total_pages) = inspect(&codec, input)?;

    let pages = parse_page_spec(pages, format, total_pages)?;
    let destination =
        output.unwrap_or_else(|| default_extraction_path(input, codec.extension()));

    let result = extract(
        &codec,
        ExtractionRequest {
            source: input.to_path_buf(),
            destination,
            pages,
        },
    );
    report_extraction(&result, json, "Pages extracted")
}
