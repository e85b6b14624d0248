use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::commands::validate::check;
use crate::engine::{
    concatenate, extract, inspect, split, BatchResult, ConcatenationRequest, ExtractionRequest,
    ExtractionResult, FailurePolicy, SplitRequest,
};
use crate::error::AssemblyError;
use crate::page_range::{parse_page_spec, PageSet, SpecFormat};
use crate::pdf::{LopdfCodec, PdfDocument};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExtractRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Pages to extract (e.g., '1-5', '1,3,5', '1-3,7,10-12')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Pages to split out (e.g., '1-3,7'); all pages when omitted")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Folder receiving one file per page")]
    pub output_dir: String,
    #[schemars(description = "Prefix for output file names (default: source file name)")]
    #[serde(default)]
    pub base_name: Option<String>,
    #[schemars(description = "Keep writing remaining pages after a failure (default: false)")]
    #[serde(default)]
    pub keep_going: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfConcatenateRequest {
    #[schemars(description = "PDF files to join, in output order")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

/// Open `path` and parse `spec` against its page count.
fn requested_pages(path: &Path, spec: Option<&str>) -> Result<PageSet, AssemblyError> {
    let (_, total) = inspect(&LopdfCodec, path)?;
    match spec {
        Some(spec) => Ok(parse_page_spec(spec, SpecFormat::Mixed, total)?),
        None => Ok(PageSet::all(total)),
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF metadata including title, author, creator, producer, version, and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.get_info();
                to_json(&PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    version: info.version,
                    title: info.title,
                    author: info.author,
                    subject: info.subject,
                    creator: info.creator,
                    producer: info.producer,
                })
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Check whether a file is a readable PDF with at least one page")]
    fn pdf_validate(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        to_json(&check(&LopdfCodec, Path::new(&path)))
    }

    #[tool(description = "Extract pages from a PDF into a new file. Pages use ranges and lists like '1-3,7,10-12'; duplicates are removed and pages keep document order.")]
    fn pdf_extract(&self, Parameters(req): Parameters<PdfExtractRequest>) -> String {
        let source = PathBuf::from(&req.path);
        let pages = match requested_pages(&source, Some(&req.pages)) {
            Ok(pages) => pages,
            Err(e) => return to_json(&ExtractionResult::failed(&e)),
        };

        let result = extract(
            &LopdfCodec,
            ExtractionRequest {
                source,
                destination: PathBuf::from(req.output),
                pages,
            },
        );
        info!(success = result.success, "pdf_extract");
        to_json(&result)
    }

    #[tool(description = "Write each selected page of a PDF to its own file named <base>_page_<n>.pdf")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let source = PathBuf::from(&req.path);
        let destination_folder = PathBuf::from(&req.output_dir);
        let pages = match requested_pages(&source, req.pages.as_deref()) {
            Ok(pages) => pages,
            Err(e) => return to_json(&BatchResult::failed(destination_folder, &e)),
        };

        let policy = if req.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        };
        let result = split(
            &LopdfCodec,
            SplitRequest {
                source,
                destination_folder,
                pages,
                base_name: req.base_name,
                policy,
            },
        );
        info!(success = result.success, files = result.files_created, "pdf_split");
        to_json(&result)
    }

    #[tool(description = "Concatenate whole PDFs in the given order. Unusable inputs are skipped and listed in the result.")]
    fn pdf_concatenate(&self, Parameters(req): Parameters<PdfConcatenateRequest>) -> String {
        let result = concatenate(
            &LopdfCodec,
            ConcatenationRequest {
                sources: req.inputs.into_iter().map(PathBuf::from).collect(),
                destination: PathBuf::from(req.output),
            },
        );
        info!(success = result.success, pages = result.page_count, "pdf_concatenate");
        to_json(&result)
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub version: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page assembly tools. Use pdf_info for document metadata, pdf_validate to \
                 check a file, pdf_extract to copy selected pages into a new PDF, pdf_split to \
                 write one PDF per page, and pdf_concatenate to join whole PDFs."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
