use anyhow::{Context, Result};
use image::GenericImageView;
use std::io::Write;

mod tesseract;

pub use tesseract::{list_tesseract_languages, normalize_ocr_languages};

/// Runs Tesseract over an in-memory image and returns the recognized
/// text, lines joined with newlines. PSM 6 (uniform block) first,
/// PSM 4 (column of text) as a fallback for sparse layouts.
pub fn extract_text(image_bytes: &[u8], ocr_languages: &str) -> Result<String> {
    let image =
        image::load_from_memory(image_bytes).with_context(|| "failed to decode image for OCR")?;
    let (width, _) = image.dimensions();
    let scale = ocr_scale(width);
    let languages = tesseract::normalize_ocr_languages(ocr_languages)?;
    let prepared = preprocess_for_ocr(image, scale);

    let mut tmp = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .with_context(|| "failed to create temp file for OCR")?;
    prepared
        .write_to(&mut tmp, image::ImageFormat::Png)
        .with_context(|| "failed to write temp image for OCR")?;
    tmp.flush().ok();

    for psm in [6u32, 4] {
        let tsv = tesseract::run_tesseract_tsv(tmp.path(), &languages, psm)?;
        let text = parse_tsv_text(&tsv);
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }
    Ok(String::new())
}

fn ocr_scale(width: u32) -> u32 {
    let max_width = 6000u32;
    let mut scale = 3u32;
    while width.saturating_mul(scale) > max_width && scale > 1 {
        scale -= 1;
    }
    scale.max(1)
}

/// Flattens alpha onto white, grayscales, upscales small sources and
/// stretches contrast. Scans and phone photos both benefit.
fn preprocess_for_ocr(image: image::DynamicImage, scale: u32) -> image::DynamicImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut luma = image::GrayImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let r = (r as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        let g = (g as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        let b = (b as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        let value = (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8;
        luma.put_pixel(x, y, image::Luma([value]));
    }

    let resized = if scale > 1 {
        image::imageops::resize(
            &luma,
            width.saturating_mul(scale),
            height.saturating_mul(scale),
            image::imageops::FilterType::Lanczos3,
        )
    } else {
        luma
    };

    image::DynamicImage::ImageLuma8(contrast_stretch(&resized))
}

fn contrast_stretch(image: &image::GrayImage) -> image::GrayImage {
    let mut min = 255u8;
    let mut max = 0u8;
    for pixel in image.pixels() {
        let value = pixel[0];
        min = min.min(value);
        max = max.max(value);
    }

    if max <= min {
        return image.clone();
    }

    let scale = 255.0 / (max as f32 - min as f32);
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let value = pixel[0];
        pixel[0] = ((value.saturating_sub(min)) as f32 * scale).round() as u8;
    }
    output
}

/// Collapses Tesseract TSV word rows (level 5) into line text, grouped
/// by page/block/paragraph/line numbers.
fn parse_tsv_text(tsv: &str) -> String {
    let mut lines: Vec<((i32, i32, i32, i32), Vec<String>)> = Vec::new();

    for (idx, row) in tsv.lines().enumerate() {
        if idx == 0 {
            continue;
        }
        let cols = row.split('\t').collect::<Vec<_>>();
        if cols.len() < 12 {
            continue;
        }
        let level: i32 = cols[0].parse().unwrap_or(0);
        if level != 5 {
            continue;
        }
        let page_num: i32 = cols[1].parse().unwrap_or(0);
        let block_num: i32 = cols[2].parse().unwrap_or(0);
        let par_num: i32 = cols[3].parse().unwrap_or(0);
        let line_num: i32 = cols[4].parse().unwrap_or(0);
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        let text = cols[11].trim();
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let key = (page_num, block_num, par_num, line_num);
        match lines.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, words)) => words.push(text.to_string()),
            None => lines.push((key, vec![text.to_string()])),
        }
    }

    lines.sort_by_key(|(key, _)| *key);
    lines
        .into_iter()
        .map(|(_, words)| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV_HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn tsv_words_group_into_lines() {
        let tsv = format!(
            "{}\n\
             5\t1\t1\t1\t1\t1\t10\t10\t40\t20\t95.2\tनेपाल\n\
             5\t1\t1\t1\t1\t2\t60\t10\t40\t20\t93.0\tसरकार\n\
             5\t1\t1\t2\t1\t1\t10\t40\t40\t20\t90.0\tKathmandu\n\
             4\t1\t1\t2\t1\t0\t10\t40\t200\t20\t-1\t\n",
            TSV_HEADER
        );
        assert_eq!(parse_tsv_text(&tsv), "नेपाल सरकार\nKathmandu");
    }

    #[test]
    fn low_confidence_and_empty_rows_are_dropped() {
        let tsv = format!(
            "{}\n\
             5\t1\t1\t1\t1\t1\t10\t10\t40\t20\t-1\tghost\n\
             5\t1\t1\t1\t1\t2\t60\t10\t40\t20\t88.0\treal\n",
            TSV_HEADER
        );
        assert_eq!(parse_tsv_text(&tsv), "real");
    }

    #[test]
    fn scale_shrinks_for_wide_images() {
        assert_eq!(ocr_scale(400), 3);
        assert_eq!(ocr_scale(2500), 2);
        assert_eq!(ocr_scale(7000), 1);
    }

    #[test]
    fn contrast_stretch_expands_range() {
        let mut gray = image::GrayImage::new(2, 1);
        gray.put_pixel(0, 0, image::Luma([100]));
        gray.put_pixel(1, 0, image::Luma([150]));
        let stretched = contrast_stretch(&gray);
        assert_eq!(stretched.get_pixel(0, 0)[0], 0);
        assert_eq!(stretched.get_pixel(1, 0)[0], 255);
    }
}
