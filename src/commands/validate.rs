use anyhow::{bail, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::engine::inspect;
use crate::pdf::{LopdfCodec, PageCodec};

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub path: PathBuf,
    pub valid: bool,
    pub page_count: u32,
    pub reason: Option<String>,
}

pub fn check<C: PageCodec>(codec: &C, path: &Path) -> ValidationReport {
    match inspect(codec, path) {
        Ok((_, page_count)) => ValidationReport {
            path: path.to_path_buf(),
            valid: true,
            page_count,
            reason: None,
        },
        Err(e) => ValidationReport {
            path: path.to_path_buf(),
            valid: false,
            page_count: 0,
            reason: Some(e.to_string()),
        },
    }
}

pub fn run(paths: &[PathBuf], json: bool) -> Result<()> {
    let reports: Vec<ValidationReport> = paths.iter().map(|p| check(&LopdfCodec, p)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            match &report.reason {
                None => println!("{}: valid ({} pages)", report.path.display(), report.page_count),
                Some(reason) => println!("{}: INVALID - {}", report.path.display(), reason),
            }
        }
    }

    let invalid = reports.iter().filter(|r| !r.valid).count();
    if invalid > 0 {
        bail!("{} of {} file(s) are invalid", invalid, reports.len());
    }
    Ok(())
}
