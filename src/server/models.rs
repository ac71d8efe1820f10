use serde::{Deserialize, Serialize};

use crate::chatbot::{ChatLanguage, ChatMode, FaqItem};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct TranslateTextRequest {
    pub(crate) text: Option<String>,
    pub(crate) source_lang: Option<String>,
    pub(crate) target_lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslateTextResponse {
    pub(crate) translated_text: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct OcrImageRequest {
    pub(crate) image_base64: Option<String>,
    pub(crate) source_lang: Option<String>,
}

/// `translated_text` is serialized as an explicit null when there was
/// nothing to translate or the text is already English.
#[derive(Debug, Serialize)]
pub(crate) struct OcrImageResponse {
    pub(crate) detected_script: String,
    pub(crate) detected_language: String,
    pub(crate) extracted_text: String,
    pub(crate) translated_text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct OcrPdfRequest {
    pub(crate) pdf_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OcrPdfResponse {
    pub(crate) extracted_text: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct SpeechToTextRequest {
    pub(crate) audio_base64: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpeechToTextResponse {
    pub(crate) transcript: String,
    pub(crate) detected_language: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct SpeechTranslateRequest {
    pub(crate) audio_base64: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) target_lang: Option<String>,
    pub(crate) filename: Option<String>,
    pub(crate) return_tts: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpeechTranslateResponse {
    pub(crate) transcript: String,
    pub(crate) detected_language: String,
    pub(crate) translated_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tts_audio_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tts_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FaqResponse {
    pub(crate) items: Vec<FaqItem>,
}

/// Unknown `mode`/`language` values are rejected at deserialization,
/// which surfaces as a 400 before the handler runs.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct ChatRequest {
    pub(crate) message: Option<String>,
    pub(crate) mode: ChatMode,
    pub(crate) language: ChatLanguage,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) reply: String,
    pub(crate) reply_language: String,
    pub(crate) reply_language_label: String,
    pub(crate) mode: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(request.mode, ChatMode::General);
        assert_eq!(request.language, ChatLanguage::Auto);
    }

    #[test]
    fn chat_request_rejects_unknown_mode() {
        let result = serde_json::from_str::<ChatRequest>(r#"{"message": "hi", "mode": "poetry"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn null_translated_text_is_explicit() {
        let response = OcrImageResponse {
            detected_script: "Latin".to_string(),
            detected_language: "en".to_string(),
            extracted_text: "hello".to_string(),
            translated_text: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("translated_text").unwrap().is_null());
    }

    #[test]
    fn tts_fields_are_omitted_when_absent() {
        let response = SpeechTranslateResponse {
            transcript: "x".to_string(),
            detected_language: "ne".to_string(),
            translated_text: "y".to_string(),
            tts_audio_path: None,
            tts_error: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("tts_audio_path").is_none());
        assert!(json.get("tts_error").is_none());
    }
}
