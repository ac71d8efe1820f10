use anyhow::{Result, anyhow};

/// Languages served by the backend. Everything downstream (Whisper,
/// Tesseract, espeak, prompts) maps from these three codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ne,
    Si,
    En,
}

impl Lang {
    pub fn parse(code: &str) -> Result<Self> {
        match code.trim().to_lowercase().as_str() {
            "ne" => Ok(Lang::Ne),
            "si" => Ok(Lang::Si),
            "en" => Ok(Lang::En),
            other => Err(anyhow!(
                "unsupported language '{}' (expected 'ne', 'si', or 'en')",
                other
            )),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::Ne => "ne",
            Lang::Si => "si",
            Lang::En => "en",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Lang::Ne => "Nepali",
            Lang::Si => "Sinhala",
            Lang::En => "English",
        }
    }

    /// Whisper language codes happen to coincide with ours.
    pub fn whisper_code(&self) -> &'static str {
        self.code()
    }

    /// Tesseract traineddata names.
    pub fn tesseract_langs(&self) -> &'static str {
        match self {
            Lang::Ne => "nep+eng",
            Lang::Si => "sin+eng",
            Lang::En => "eng",
        }
    }

    pub fn espeak_voice(&self) -> &'static str {
        match self {
            Lang::Ne => "ne",
            Lang::Si => "si",
            Lang::En => "en",
        }
    }
}

/// Writing system of a piece of text, decided by Unicode block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Sinhala,
    Devanagari,
    Latin,
}

impl Script {
    pub fn label(&self) -> &'static str {
        match self {
            Script::Sinhala => "Sinhala",
            Script::Devanagari => "Devanagari",
            Script::Latin => "Latin",
        }
    }
}

/// Sinhala wins over Devanagari when both appear; anything without
/// either block is treated as Latin.
pub fn detect_script(text: &str) -> Script {
    let mut has_devanagari = false;
    for ch in text.chars() {
        let code = ch as u32;
        if (0x0D80..=0x0DFF).contains(&code) {
            return Script::Sinhala;
        }
        if (0x0900..=0x097F).contains(&code) {
            has_devanagari = true;
        }
    }
    if has_devanagari {
        Script::Devanagari
    } else {
        Script::Latin
    }
}

pub fn detect_lang(text: &str) -> Lang {
    match detect_script(text) {
        Script::Sinhala => Lang::Si,
        Script::Devanagari => Lang::Ne,
        Script::Latin => Lang::En,
    }
}
