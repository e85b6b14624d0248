pub mod concat;
pub mod extract;
pub mod info;
pub mod interactive;
pub mod split;
pub mod validate;

use anyhow::{bail, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::engine::{BatchResult, ExtractionResult};

/// `<dir>/<stem>_extracted.<ext>` for an input `<dir>/<stem>.*`.
pub fn default_extraction_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    parent_dir(input).join(format!("{}_extracted.{}", stem, extension))
}

/// Directory containing `path`, `.` for bare file names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

pub fn write_extraction<W: Write>(
    out: &mut W,
    result: &ExtractionResult,
    count_label: &str,
) -> io::Result<()> {
    if result.success {
        writeln!(out, "{}", result.message)?;
        if let Some(path) = &result.output_path {
            writeln!(out, "  Output file: {}", path.display())?;
        }
        writeln!(out, "  {}: {}", count_label, result.page_count)?;
    } else {
        writeln!(out, "Error: {}", result.message)?;
    }
    for path in &result.skipped {
        writeln!(out, "  Skipped: {}", path.display())?;
    }
    Ok(())
}

pub fn write_batch<W: Write>(out: &mut W, result: &BatchResult) -> io::Result<()> {
    if result.success {
        writeln!(out, "{}", result.message)?;
    } else {
        writeln!(out, "Error: {}", result.message)?;
    }
    writeln!(out, "  Output folder: {}", result.output_folder.display())?;
    writeln!(out, "  Files created: {}", result.files_created)?;
    for file in &result.created_files {
        let name = file.file_name().unwrap_or(file.as_os_str());
        writeln!(out, "    - {}", name.to_string_lossy())?;
    }
    Ok(())
}

/// Print a result for the command line; a failed result becomes an error.
pub fn report_extraction(result: &ExtractionResult, json: bool, count_label: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.success {
        write_extraction(&mut io::stdout().lock(), result, count_label)?;
    } else {
        for path in &result.skipped {
            eprintln!("Skipped: {}", path.display());
        }
    }

    if !result.success {
        bail!("{}", result.message);
    }
    Ok(())
}

pub fn report_batch(result: &BatchResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        write_batch(&mut io::stdout().lock(), result)?;
    }

    if !result.success {
        bail!("{}", result.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblyError;

    #[test]
    fn test_default_extraction_path() {
        assert_eq!(
            default_extraction_path(Path::new("docs/report.pdf"), "pdf"),
            PathBuf::from("docs/report_extracted.pdf")
        );
        assert_eq!(
            default_extraction_path(Path::new("report.PDF"), "pdf"),
            PathBuf::from("./report_extracted.pdf")
        );
    }

    #[test]
    fn test_write_batch_lists_file_names() {
        let result = BatchResult {
            success: true,
            message: "Successfully extracted 2 files.".to_string(),
            output_folder: PathBuf::from("out"),
            files_created: 2,
            created_files: vec![
                PathBuf::from("out/a_page_1.pdf"),
                PathBuf::from("out/a_page_2.pdf"),
            ],
            error: None,
            failed_pages: vec![],
        };
        let mut buf = Vec::new();
        write_batch(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Files created: 2"));
        assert!(text.contains("    - a_page_2.pdf"));
    }

    #[test]
    fn test_report_failure_is_error() {
        let result = ExtractionResult::failed(&AssemblyError::NoContent);
        let err = report_extraction(&result, false, "Total pages").unwrap_err();
        assert_eq!(err.to_string(), "No content was added to the merged document");
    }
}
