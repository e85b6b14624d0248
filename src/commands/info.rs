use anyhow::Result;
use std::path::Path;

use crate::pdf::PdfDocument;

pub fn run(path: &Path, json: bool) -> Result<()> {
    let doc = PdfDocument::open(path)?;
    let info = doc.get_info();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File: {}", path.display());
    println!("Pages: {}", info.page_count);
    println!("Version: {}", info.version);

    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Creator", &info.creator),
        ("Producer", &info.producer),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }

    Ok(())
}
