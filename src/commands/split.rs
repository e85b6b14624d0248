use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{parent_dir, report_batch};
use crate::engine::{inspect, split, FailurePolicy, SplitRequest};
use crate::page_range::{parse_page_spec, PageSet, SpecFormat};
use crate::pdf::LopdfCodec;

pub struct SplitOptions {
    pub pages: Option<String>,
    pub format: SpecFormat,
    pub output_dir: Option<PathBuf>,
    pub base_name: Option<String>,
    pub keep_going: bool,
}

pub fn run(input: &Path, options: SplitOptions, json: bool) -> Result<()> {
    let codec = LopdfCodec;
    let (_, total_pages) = inspect(&codec, input)?;

    let pages = match &options.pages {
        Some(spec) => parse_page_spec(spec, options.format, total_pages)?,
        None => PageSet::all(total_pages),
    };

    let policy = if options.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let result = split(
        &codec,
        SplitRequest {
            source: input.to_path_buf(),
            destination_folder: options.output_dir.unwrap_or_else(|| parent_dir(input)),
            pages,
            base_name: options.base_name,
            policy,
        },
    );
    report_batch(&result, json)
}
