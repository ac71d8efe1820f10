use std::path::PathBuf;
use std::sync::Arc;

use crate::languages::Lang;
use crate::providers::Ollama;
use crate::settings::Settings;
use crate::speech::WhisperEngine;
use crate::translator::Translator;

/// Shared per-process state. The Whisper context is loaded once at
/// startup; `None` means the model could not be loaded and speech
/// endpoints report that instead of failing the whole server.
pub(crate) struct ServerState {
    pub(crate) settings: Settings,
    pub(crate) whisper: Option<Arc<WhisperEngine>>,
}

impl ServerState {
    pub(crate) fn translator(&self) -> Translator<Ollama> {
        Translator::new(Ollama::new(
            self.settings.ollama_base_url.as_str(),
            self.settings.translation_model.as_str(),
        ))
    }

    pub(crate) fn chat_provider(&self, model: &str) -> Ollama {
        Ollama::new(self.settings.ollama_base_url.as_str(), model)
            .with_temperature(self.settings.chat_temperature)
    }

    /// Tesseract language set for a single-language image, unless the
    /// settings pin an explicit override.
    pub(crate) fn ocr_languages(&self, source: Lang) -> String {
        self.settings
            .ocr_languages
            .clone()
            .unwrap_or_else(|| source.tesseract_langs().to_string())
    }

    /// PDFs can mix scripts, so the default set covers all three.
    pub(crate) fn pdf_ocr_languages(&self) -> String {
        self.settings
            .ocr_languages
            .clone()
            .unwrap_or_else(|| "nep+sin+eng".to_string())
    }

    pub(crate) fn tmp_dir(&self) -> PathBuf {
        match self.settings.server_tmp_dir.as_deref() {
            Some(dir) => PathBuf::from(dir),
            None => std::env::temp_dir().join("transly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ServerState {
        ServerState {
            settings: Settings::default(),
            whisper: None,
        }
    }

    #[test]
    fn ocr_languages_follow_source() {
        let state = state();
        assert_eq!(state.ocr_languages(Lang::Ne), "nep+eng");
        assert_eq!(state.ocr_languages(Lang::En), "eng");
        assert_eq!(state.pdf_ocr_languages(), "nep+sin+eng");
    }

    #[test]
    fn ocr_language_override_wins() {
        let mut state = state();
        state.settings.ocr_languages = Some("sin".to_string());
        assert_eq!(state.ocr_languages(Lang::Ne), "sin");
        assert_eq!(state.pdf_ocr_languages(), "sin");
    }
}
