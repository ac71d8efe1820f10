use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Decodes a base64 request field, tolerating `data:<mime>;base64,`
/// prefixes the way browser clients send them.
pub fn decode_base64_field(value: &str, field: &str) -> Result<Vec<u8>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} must be a non-empty string", field));
    }
    let encoded = if trimmed.starts_with("data:") {
        trimmed
            .split_once(',')
            .map(|(_, rest)| rest)
            .ok_or_else(|| anyhow!("invalid data URL in {}", field))?
    } else {
        trimmed
    };
    BASE64
        .decode(encoded.trim())
        .with_context(|| format!("invalid base64 in {}", field))
}

/// Scratch-file extension for uploaded audio. The client filename is
/// only a hint; the decoded bytes win when `infer` recognizes them.
pub fn audio_extension(bytes: &[u8], filename: Option<&str>) -> &'static str {
    if let Some(kind) = infer::get(bytes) {
        match kind.extension() {
            "wav" => return "wav",
            "mp3" => return "mp3",
            "m4a" => return "m4a",
            "ogg" | "oga" => return "ogg",
            "flac" => return "flac",
            "webm" => return "webm",
            "aac" => return "aac",
            _ => {}
        }
    }
    let lower = filename.unwrap_or_default().to_lowercase();
    match lower.rsplit_once('.').map(|(_, ext)| ext) {
        Some("mp3") => "mp3",
        Some("m4a") => "m4a",
        Some("ogg") | Some("oga") => "ogg",
        Some("flac") => "flac",
        Some("webm") => "webm",
        Some("aac") => "aac",
        _ => "wav",
    }
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
        || infer::get(bytes).is_some_and(|kind| kind.mime_type() == "application/pdf")
}

pub fn is_image(bytes: &[u8]) -> bool {
    infer::get(bytes).is_some_and(|kind| kind.mime_type().starts_with("image/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_base64() {
        let decoded = decode_base64_field("aGVsbG8=", "image_base64").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn decodes_data_url() {
        let decoded =
            decode_base64_field("data:audio/wav;base64,aGVsbG8=", "audio_base64").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn rejects_empty_and_invalid_input() {
        assert!(decode_base64_field("", "audio_base64").is_err());
        assert!(decode_base64_field("   ", "audio_base64").is_err());
        assert!(decode_base64_field("data:audio/wav;base64", "audio_base64").is_err());
        let err = decode_base64_field("not base64!!", "audio_base64").unwrap_err();
        assert!(err.to_string().contains("audio_base64"));
    }

    #[test]
    fn audio_extension_prefers_sniffed_bytes() {
        // RIFF/WAVE header wins over a misleading filename.
        let mut wav = b"RIFF".to_vec();
        wav.extend_from_slice(&[0, 0, 0, 0]);
        wav.extend_from_slice(b"WAVE");
        assert_eq!(audio_extension(&wav, Some("speech.mp3")), "wav");
    }

    #[test]
    fn audio_extension_falls_back_to_filename() {
        assert_eq!(audio_extension(b"garbage", Some("clip.m4a")), "m4a");
        assert_eq!(audio_extension(b"garbage", Some("clip.OGA")), "ogg");
        assert_eq!(audio_extension(b"garbage", None), "wav");
        assert_eq!(audio_extension(b"garbage", Some("noext")), "wav");
    }

    #[test]
    fn pdf_detection() {
        assert!(is_pdf(b"%PDF-1.7 rest"));
        assert!(!is_pdf(b"plain text"));
    }
}
