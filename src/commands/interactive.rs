//! Menu-driven front end over the assembly engines.
//!
//! All prompting goes through [`Prompter`], which works on any reader and
//! writer so sessions can be scripted.

use anyhow::{anyhow, Result};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use super::concat::{
    default_concatenation_path, exclude_destination, folder_sources, ConcatenationMode,
};
use super::{default_extraction_path, parent_dir, write_batch, write_extraction};
use crate::engine::{
    concatenate, extract, inspect, split, validate, ConcatenationRequest, ExtractionRequest,
    FailurePolicy, SplitRequest,
};
use crate::page_range::{parse_page_spec, PageSet, SpecFormat};
use crate::pdf::{LopdfCodec, PageCodec};

pub fn run() -> Result<()> {
    let stdin = io::stdin();
    let mut session = Session::new(&LopdfCodec, stdin.lock(), io::stdout());
    session.run()
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Show `prompt` and read one trimmed line; `None` at end of input.
    fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.read(prompt)?.ok_or_else(|| anyhow!("Input closed"))
    }

    fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Ask until the answer names an existing file with the codec's extension.
    pub fn file_path<C: PageCodec>(&mut self, codec: &C, prompt: &str) -> Result<PathBuf> {
        loop {
            let input = clean_path(&self.ask(&format!("{}: ", prompt))?);
            if input.is_empty() {
                self.say("Please provide a valid file path.")?;
                continue;
            }
            let path = PathBuf::from(input);
            if !path.is_file() {
                self.say("File not found. Please check the path and try again.")?;
                continue;
            }
            if !super::has_extension(&path, codec.extension()) {
                self.say(format!("Please provide a .{} file.", codec.extension()))?;
                continue;
            }
            return Ok(path);
        }
    }

    /// Ask for a grammar, then for a specification until one parses.
    pub fn page_numbers(&mut self, total_pages: u32) -> Result<PageSet> {
        self.say(format!("\nPDF has {} pages.", total_pages))?;
        self.say("How would you like to specify pages?")?;
        self.say("1. Sequential range (e.g., 1-5)")?;
        self.say("2. Individual page numbers (e.g., 1,3,5,7)")?;
        self.say("3. Mixed (e.g., 1-3,7,10-12)")?;

        let (format, prompt) = loop {
            match self.ask("\nSelect option (1-3): ")?.as_str() {
                "1" => break (SpecFormat::Range, "Enter page range (e.g., 1-5)"),
                "2" => break (
                    SpecFormat::List,
                    "Enter page numbers separated by commas (e.g., 1,3,5)",
                ),
                "3" => break (SpecFormat::Mixed, "Enter mixed format (e.g., 1-3,7,10-12)"),
                _ => self.say("Invalid choice. Please select 1, 2, or 3.")?,
            }
        };

        loop {
            let spec = self.ask(&format!("{} [1-{}]: ", prompt, total_pages))?;
            match parse_page_spec(&spec, format, total_pages) {
                Ok(pages) => return Ok(pages),
                Err(e) => self.say(e)?,
            }
        }
    }

    /// Ask for an output file; Enter keeps `default`.
    pub fn output_path(&mut self, default: &Path) -> Result<PathBuf> {
        let input = clean_path(&self.ask(&format!(
            "\nOutput file path (press Enter for '{}'): ",
            default.display()
        ))?);
        Ok(if input.is_empty() {
            default.to_path_buf()
        } else {
            PathBuf::from(input)
        })
    }

    /// Ask for an output folder; Enter keeps `default`.
    pub fn output_folder(&mut self, default: &Path) -> Result<PathBuf> {
        let input = clean_path(&self.ask(&format!(
            "\nOutput folder (press Enter for '{}'): ",
            default.display()
        ))?);
        Ok(if input.is_empty() {
            default.to_path_buf()
        } else {
            PathBuf::from(input)
        })
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.ask(prompt)?.eq_ignore_ascii_case("y"))
    }

    /// Ask for a folder until one holding at least one matching file is given.
    pub fn folder_files(&mut self, extension: &str) -> Result<Vec<PathBuf>> {
        loop {
            let input = clean_path(&self.ask("Enter folder path containing PDF files: ")?);
            if input.is_empty() {
                self.say("Please provide a valid folder path.")?;
                continue;
            }
            let folder = PathBuf::from(input);
            if !folder.is_dir() {
                self.say("Folder not found. Please check the path and try again.")?;
                continue;
            }
            let files = folder_sources(&folder, extension)?;
            if files.is_empty() {
                self.say("No PDF files found in the specified folder.")?;
                continue;
            }
            self.say(format!("Found {} PDF files in the folder.", files.len()))?;
            return Ok(files);
        }
    }

    /// Collect paths one per line until an empty line, validating each.
    pub fn individual_files<C: PageCodec>(&mut self, codec: &C) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.say("Enter paths of PDF files to concatenate (one per line).")?;
        self.say("Press Enter on an empty line when done.")?;

        loop {
            let input = clean_path(&self.ask(&format!(
                "PDF file path #{} (or Enter to finish): ",
                files.len() + 1
            ))?);
            if input.is_empty() {
                if files.is_empty() {
                    self.say("Please provide at least one PDF file.")?;
                    continue;
                }
                return Ok(files);
            }

            let path = PathBuf::from(input);
            if !path.is_file() {
                self.say("File not found. Please check the path and try again.")?;
            } else if validate(codec, &path) {
                self.say(format!("Added: {}", display_name(&path)))?;
                files.push(path);
            } else {
                self.say("The file appears to be an invalid PDF. Please try another file.")?;
            }
        }
    }
}

fn clean_path(input: &str) -> String {
    input.trim().trim_matches('"').to_string()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

pub struct Session<'c, C, R, W> {
    codec: &'c C,
    prompter: Prompter<R, W>,
}

impl<'c, C: PageCodec, R: BufRead, W: Write> Session<'c, C, R, W> {
    pub fn new(codec: &'c C, input: R, output: W) -> Self {
        Session {
            codec,
            prompter: Prompter::new(input, output),
        }
    }

    /// Show the menu until the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.prompter.say("=== PDF Processing Application ===\n")?;
        loop {
            self.prompter.say("Available functionalities:")?;
            self.prompter.say("1. Extract Pages from PDF")?;
            self.prompter.say("2. Split PDF Pages into Separate Files")?;
            self.prompter.say("3. Concatenate PDF Files")?;
            self.prompter.say("Q. Quit")?;

            let Some(choice) = self.prompter.read("\nSelect an option: ")? else {
                return Ok(());
            };
            let outcome = match choice.to_lowercase().as_str() {
                "q" => {
                    self.prompter.say("Goodbye!")?;
                    return Ok(());
                }
                "1" => self.extract_pages(),
                "2" => self.split_pages(),
                "3" => self.concatenate_files(),
                _ => self.prompter.say("Invalid choice. Please try again.\n"),
            };
            if let Err(e) = outcome {
                self.prompter.say(format!("An error occurred: {}\n", e))?;
            }
        }
    }

    /// Ask for a source file and report its page count, or `None` when unusable.
    fn source_document(&mut self) -> Result<Option<(PathBuf, u32)>> {
        let path = self.prompter.file_path(self.codec, "Enter PDF file path")?;
        match inspect(self.codec, &path) {
            Ok((_, pages)) => Ok(Some((path, pages))),
            Err(e) => {
                self.prompter.say(format!("Error: Invalid or corrupted PDF file ({}).\n", e))?;
                Ok(None)
            }
        }
    }

    fn extract_pages(&mut self) -> Result<()> {
        self.prompter.say("\n=== PDF Page Extraction ===")?;
        let Some((source, total_pages)) = self.source_document()? else {
            return Ok(());
        };
        let pages = self.prompter.page_numbers(total_pages)?;
        let default = default_extraction_path(&source, self.codec.extension());
        let destination = self.prompter.output_path(&default)?;

        self.prompter.say(format!("\nExtracting pages {}...", pages))?;
        let result = extract(
            self.codec,
            ExtractionRequest {
                source,
                destination,
                pages,
            },
        );
        self.prompter.say("")?;
        write_extraction(&mut self.prompter.output, &result, "Pages extracted")?;
        self.prompter.say("")
    }

    fn split_pages(&mut self) -> Result<()> {
        self.prompter.say("\n=== Split PDF Pages into Separate Files ===")?;
        let Some((source, total_pages)) = self.source_document()? else {
            return Ok(());
        };
        let pages = self.prompter.page_numbers(total_pages)?;
        let destination_folder = self.prompter.output_folder(&parent_dir(&source))?;

        self.prompter.say(format!(
            "\nExtracting {} page(s) into separate files...",
            pages.len()
        ))?;
        let result = split(
            self.codec,
            SplitRequest {
                source,
                destination_folder,
                pages,
                base_name: None,
                policy: FailurePolicy::Abort,
            },
        );
        self.prompter.say("")?;
        write_batch(&mut self.prompter.output, &result)?;
        self.prompter.say("")
    }

    fn concatenate_files(&mut self) -> Result<()> {
        self.prompter.say("\n=== PDF Concatenation ===")?;
        self.prompter.say("\nHow would you like to specify PDF files?")?;
        self.prompter.say("1. From folder (all PDF files in alphabetical order)")?;
        self.prompter.say("2. Individual files (specify each file path)")?;

        let mode = loop {
            match self.prompter.ask("\nSelect option (1-2): ")?.as_str() {
                "1" => break ConcatenationMode::FromFolder,
                "2" => break ConcatenationMode::IndividualFiles,
                _ => self.prompter.say("Invalid choice. Please select 1 or 2.")?,
            }
        };

        let files = match mode {
            ConcatenationMode::FromFolder => self.prompter.folder_files(self.codec.extension())?,
            ConcatenationMode::IndividualFiles => self.prompter.individual_files(self.codec)?,
        };

        let mut sources = self.summarize(&files)?;
        let Some(first) = sources.first() else {
            self.prompter.say("No valid PDF files to concatenate.\n")?;
            return Ok(());
        };
        if !self.prompter.confirm("\nProceed with concatenation? (y/n): ")? {
            self.prompter.say("Concatenation cancelled.\n")?;
            return Ok(());
        }

        let default = default_concatenation_path(first, mode);
        let destination = self.prompter.output_path(&default)?;
        let from_folder = mode == ConcatenationMode::FromFolder;
        if from_folder && exclude_destination(&mut sources, &destination) {
            self.prompter.say(format!(
                "Leaving out {}: it is the output file.",
                display_name(&destination)
            ))?;
            if sources.is_empty() {
                self.prompter.say("No valid PDF files to concatenate.\n")?;
                return Ok(());
            }
        }

        self.prompter.say(format!("\nConcatenating {} PDF files...", sources.len()))?;
        let result = concatenate(
            self.codec,
            ConcatenationRequest {
                sources,
                destination,
            },
        );
        self.prompter.say("")?;
        write_extraction(&mut self.prompter.output, &result, "Total pages")?;
        self.prompter.say("")
    }

    /// Print one line per file with its page count and keep the valid ones.
    fn summarize(&mut self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        self.prompter.say("\n=== Concatenation Summary ===")?;
        let mut valid = Vec::new();
        let mut total_pages = 0;

        for (i, file) in files.iter().enumerate() {
            let name = display_name(file);
            match inspect(self.codec, file) {
                Ok((_, pages)) => {
                    self.prompter.say(format!("{}. {} ({} pages)", i + 1, name, pages))?;
                    total_pages += pages;
                    valid.push(file.clone());
                }
                Err(_) => self.prompter.say(format!("{}. {} (INVALID - SKIPPED)", i + 1, name))?,
            }
        }

        if !valid.is_empty() {
            self.prompter.say(format!(
                "\nTotal: {} files, {} pages",
                valid.len(),
                total_pages
            ))?;
        }
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{read_pages, write_doc, TextCodec};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    type TestSession<'c> = Session<'c, TextCodec, Cursor<Vec<u8>>, Vec<u8>>;

    fn session(codec: &TextCodec, input: String) -> TestSession<'_> {
        Session::new(codec, Cursor::new(input.into_bytes()), Vec::new())
    }

    fn transcript<C>(session: Session<'_, C, Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(session.prompter.output).unwrap()
    }

    #[test]
    fn test_page_numbers_retries_until_valid() {
        let mut p = prompter("7\n3\n1-20\n1-3, 8\n");
        let pages = p.page_numbers(10).unwrap();
        assert_eq!(pages.as_slice(), &[1, 2, 3, 8]);

        let out = String::from_utf8(p.output).unwrap();
        assert!(out.contains("Invalid choice. Please select 1, 2, or 3."));
        assert!(out.contains("Invalid range 1-20"));
    }

    #[test]
    fn test_output_path_default_and_quotes() {
        let mut p = prompter("\n\"custom/out.pdf\"\n");
        let default = Path::new("in/doc_extracted.pdf");
        assert_eq!(p.output_path(default).unwrap(), default.to_path_buf());
        assert_eq!(p.output_path(default).unwrap(), PathBuf::from("custom/out.pdf"));
    }

    #[test]
    fn test_input_closed_is_error() {
        let mut p = prompter("");
        assert!(p.page_numbers(3).is_err());
    }

    #[test]
    fn test_file_path_rejects_missing_and_wrong_extension() {
        let dir = tempdir().unwrap();
        let good = write_doc(dir.path(), "good.pdf", 1);
        let txt = write_doc(dir.path(), "notes.txt", 1);
        let input = format!(
            "\n{}\n{}\n{}\n",
            dir.path().join("missing.pdf").display(),
            txt.display(),
            good.display()
        );
        let mut p = prompter(&input);

        let path = p.file_path(&TextCodec::default(), "Enter PDF file path").unwrap();
        assert_eq!(path, good);
        let out = String::from_utf8(p.output).unwrap();
        assert!(out.contains("File not found"));
        assert!(out.contains("Please provide a .pdf file."));
    }

    #[test]
    fn test_extract_session_uses_default_output() {
        let dir = tempdir().unwrap();
        let source = write_doc(dir.path(), "report.pdf", 6);
        let codec = TextCodec::default();
        let input = format!("1\n{}\n2\n6,2,2\n\nq\n", source.display());

        let mut s = session(&codec, input);
        s.run().unwrap();

        let output = dir.path().join("report_extracted.pdf");
        assert_eq!(read_pages(&output), vec!["report-2", "report-6"]);
        let text = transcript(s);
        assert!(text.contains("Pages extracted successfully!"));
        assert!(text.contains("Goodbye!"));
    }

    #[test]
    fn test_split_session() {
        let dir = tempdir().unwrap();
        let source = write_doc(dir.path(), "deck.pdf", 3);
        let folder = dir.path().join("pages");
        let codec = TextCodec::default();
        let input = format!("2\n{}\n1\n2-3\n{}\n", source.display(), folder.display());

        let mut s = session(&codec, input);
        s.run().unwrap();

        assert_eq!(read_pages(&folder.join("deck_page_2.pdf")), vec!["deck-2"]);
        assert_eq!(read_pages(&folder.join("deck_page_3.pdf")), vec!["deck-3"]);
        assert!(transcript(s).contains("Files created: 2"));
    }

    #[test]
    fn test_concatenate_folder_session() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "b.pdf", 1);
        write_doc(dir.path(), "a.pdf", 2);
        std::fs::write(dir.path().join("broken.pdf"), b"").unwrap();
        let codec = TextCodec::default();
        let input = format!("3\n1\n{}\ny\n\n", dir.path().display());

        let mut s = session(&codec, input);
        s.run().unwrap();

        let output = dir.path().join("concatenated_folder_pdfs.pdf");
        assert_eq!(read_pages(&output), vec!["a-1", "a-2", "b-1"]);
        let text = transcript(s);
        assert!(text.contains("broken.pdf (INVALID - SKIPPED)"));
        assert!(text.contains("Total: 2 files, 3 pages"));
    }

    #[test]
    fn test_concatenate_folder_rerun_skips_previous_output() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "a.pdf", 2);
        write_doc(dir.path(), "b.pdf", 1);
        let codec = TextCodec::default();
        let input = format!("3\n1\n{}\ny\n\n", dir.path().display());

        session(&codec, input.clone()).run().unwrap();
        let mut rerun = session(&codec, input);
        rerun.run().unwrap();

        let output = dir.path().join("concatenated_folder_pdfs.pdf");
        assert_eq!(read_pages(&output), vec!["a-1", "a-2", "b-1"]);
        assert!(transcript(rerun).contains("Leaving out concatenated_folder_pdfs.pdf"));
    }

    #[test]
    fn test_concatenate_individual_files_declined() {
        let dir = tempdir().unwrap();
        let a = write_doc(dir.path(), "a.pdf", 1);
        let codec = TextCodec::default();
        let input = format!("3\n2\n{}\n\nn\nq\n", a.display());

        let mut s = session(&codec, input);
        s.run().unwrap();

        assert!(!dir.path().join("concatenated_files.pdf").exists());
        assert!(transcript(s).contains("Concatenation cancelled."));
    }

    #[test]
    fn test_unknown_menu_choice() {
        let codec = TextCodec::default();
        let mut s = session(&codec, "9\nq\n".to_string());
        s.run().unwrap();
        assert!(transcript(s).contains("Invalid choice. Please try again."));
    }
}
