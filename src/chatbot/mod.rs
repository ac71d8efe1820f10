use serde::{Deserialize, Serialize};

use crate::languages::{Lang, detect_lang};
use crate::settings::Settings;

mod faq;
mod prompts;

pub use faq::{FaqItem, faq_items};

/// Which downstream prompt/model a chat request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    HistoryCulture,
    Travel,
    Summarize,
    Sentiment,
    #[default]
    General,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::HistoryCulture => "history_culture",
            ChatMode::Travel => "travel",
            ChatMode::Summarize => "summarize",
            ChatMode::Sentiment => "sentiment",
            ChatMode::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatLanguage {
    #[default]
    Auto,
    En,
    Ne,
    Si,
}

impl ChatLanguage {
    pub fn as_lang(&self) -> Option<Lang> {
        match self {
            ChatLanguage::Auto => None,
            ChatLanguage::En => Some(Lang::En),
            ChatLanguage::Ne => Some(Lang::Ne),
            ChatLanguage::Si => Some(Lang::Si),
        }
    }
}

/// The factual model answers descriptive questions better; the
/// structured model is the safer default for constrained tasks.
pub fn choose_model<'a>(mode: ChatMode, settings: &'a Settings) -> &'a str {
    match mode {
        ChatMode::HistoryCulture | ChatMode::Travel => &settings.factual_model,
        ChatMode::Summarize | ChatMode::Sentiment | ChatMode::General => {
            &settings.structured_model
        }
    }
}

/// Assembles the system prompt: fact preamble, output-language
/// instruction, then the mode-specific instruction in the requested
/// language (English text when auto-detecting).
pub fn build_system_prompt(mode: ChatMode, language: ChatLanguage) -> String {
    let mut base = String::from(prompts::FACTS_PREAMBLE);

    match language {
        ChatLanguage::En => base.push_str("Always respond in clear English.\n\n"),
        ChatLanguage::Ne => {
            base.push_str("Always respond in clear Nepali (Devanagari script).\n\n")
        }
        ChatLanguage::Si => base.push_str("Always respond in clear Sinhala script.\n\n"),
        ChatLanguage::Auto => base.push_str(
            "Detect the language of the user's message and respond in that same language, \
             unless they explicitly request another language.\n\n",
        ),
    }

    base.push_str(prompts::mode_prompt(mode, language.as_lang().unwrap_or(Lang::En)));
    base.push('\n');
    base
}

/// Language reported back to the client: the explicit request wins,
/// otherwise the reply text decides via its script.
pub fn reply_language(requested: ChatLanguage, reply: &str) -> Lang {
    requested.as_lang().unwrap_or_else(|| detect_lang(reply))
}
