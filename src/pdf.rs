use anyhow::{Context, Result, anyhow};
use std::fs;
use std::process::Command;
use tempfile::tempdir;
use tracing::info;

use crate::ocr;
use crate::speech::command_exists;

/// OCRs a whole PDF: every page is rasterized at 200 dpi and run
/// through Tesseract, page texts joined with blank lines.
pub fn extract_pdf_text(pdf_bytes: &[u8], ocr_languages: &str) -> Result<String> {
    let pages = render_pdf_pages(pdf_bytes)?;
    if pages.is_empty() {
        return Err(anyhow!("no pages found in pdf"));
    }
    info!("pdf: rendered {} page(s) for OCR", pages.len());

    let mut texts = Vec::new();
    for page in &pages {
        let text = ocr::extract_text(page, ocr_languages)?;
        if !text.trim().is_empty() {
            texts.push(text);
        }
    }
    Ok(texts.join("\n\n"))
}

fn render_pdf_pages(pdf_bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let dir = tempdir().with_context(|| "failed to create temp dir for pdf")?;
    let input_path = dir.path().join("input.pdf");
    fs::write(&input_path, pdf_bytes).with_context(|| "failed to write temp pdf")?;

    if command_exists("mutool") {
        let output = Command::new("mutool")
            .arg("draw")
            .arg("-r")
            .arg("200")
            .arg("-o")
            .arg(dir.path().join("page-%03d.png"))
            .arg(&input_path)
            .output()
            .with_context(|| "failed to run mutool")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("mutool failed: {}", stderr.trim()));
        }
    } else if command_exists("pdftoppm") {
        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg("200")
            .arg(&input_path)
            .arg(dir.path().join("page"))
            .output()
            .with_context(|| "failed to run pdftoppm")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("pdftoppm failed: {}", stderr.trim()));
        }
    } else {
        return Err(anyhow!(
            "pdf rendering requires mutool or pdftoppm (install mupdf or poppler)"
        ));
    }

    let mut pages = Vec::new();
    let mut entries: Vec<_> = fs::read_dir(dir.path())
        .with_context(|| "failed to read temp pdf directory")?
        .filter_map(|entry| entry.ok())
        .collect();
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();
        if path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("page"))
            .unwrap_or(false)
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        {
            let bytes = fs::read(&path).with_context(|| "failed to read rendered pdf page")?;
            pages.push(bytes);
        }
    }
    Ok(pages)
}
