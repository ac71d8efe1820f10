use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone)]
pub struct Settings {
    pub listen: String,
    pub server_tmp_dir: Option<String>,
    pub ollama_base_url: String,
    pub factual_model: String,
    pub structured_model: String,
    pub translation_model: String,
    pub chat_temperature: f32,
    pub whisper_model: Option<String>,
    pub ocr_languages: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            server_tmp_dir: None,
            ollama_base_url: "http://localhost:11434".to_string(),
            factual_model: "gemma:2b".to_string(),
            structured_model: "qwen2:1.5b".to_string(),
            translation_model: "gemma:2b".to_string(),
            chat_temperature: 0.4,
            whisper_model: None,
            ocr_languages: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    server: Option<ServerSettings>,
    ollama: Option<OllamaSettings>,
    whisper: Option<WhisperSettings>,
    ocr: Option<OcrSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    listen: Option<String>,
    tmp_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OllamaSettings {
    base_url: Option<String>,
    factual_model: Option<String>,
    structured_model: Option<String>,
    translation_model: Option<String>,
    temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct WhisperSettings {
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OcrSettings {
    languages: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    ensure_home_settings_file()?;

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    settings.apply_env();
    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(server) = incoming.server {
            if let Some(listen) = server.listen {
                if !listen.trim().is_empty() {
                    self.listen = listen;
                }
            }
            if let Some(dir) = server.tmp_dir {
                if !dir.trim().is_empty() {
                    self.server_tmp_dir = Some(dir);
                }
            }
        }
        if let Some(ollama) = incoming.ollama {
            if let Some(url) = ollama.base_url {
                if !url.trim().is_empty() {
                    self.ollama_base_url = url;
                }
            }
            if let Some(model) = ollama.factual_model {
                if !model.trim().is_empty() {
                    self.factual_model = model;
                }
            }
            if let Some(model) = ollama.structured_model {
                if !model.trim().is_empty() {
                    self.structured_model = model;
                }
            }
            if let Some(model) = ollama.translation_model {
                if !model.trim().is_empty() {
                    self.translation_model = model;
                }
            }
            if let Some(temperature) = ollama.temperature {
                if (0.0..=2.0).contains(&temperature) {
                    self.chat_temperature = temperature;
                }
            }
        }
        if let Some(whisper) = incoming.whisper {
            if let Some(model) = whisper.model {
                if !model.trim().is_empty() {
                    self.whisper_model = Some(model);
                }
            }
        }
        if let Some(ocr) = incoming.ocr {
            if let Some(languages) = ocr.languages {
                if !languages.trim().is_empty() {
                    self.ocr_languages = Some(languages);
                }
            }
        }
    }

    fn apply_env(&mut self) {
        if let Some(url) = get_env("OLLAMA_BASE_URL") {
            self.ollama_base_url = url;
        }
        if let Some(model) = get_env("TRANSLY_WHISPER_MODEL") {
            self.whisper_model = Some(model);
        }
    }
}

fn get_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn ensure_home_settings_file() -> Result<()> {
    let Some(home) = home_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".transly"))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::with_temp_home;

    #[test]
    fn defaults_match_embedded_file() {
        let parsed: SettingsFile = toml::from_str(DEFAULT_SETTINGS_TOML).unwrap();
        let mut settings = Settings::default();
        settings.merge(parsed);
        assert_eq!(settings.listen, "0.0.0.0:8000");
        assert_eq!(settings.ollama_base_url, "http://localhost:11434");
        assert_eq!(settings.factual_model, "gemma:2b");
        assert_eq!(settings.structured_model, "qwen2:1.5b");
        assert!((settings.chat_temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(settings.whisper_model.as_deref(), Some("base"));
    }

    #[test]
    fn merge_ignores_blank_and_out_of_range_values() {
        let parsed: SettingsFile = toml::from_str(
            r#"
            [ollama]
            base_url = ""
            translation_model = "aya:8b"
            temperature = 9.0
            "#,
        )
        .unwrap();
        let mut settings = Settings::default();
        settings.merge(parsed);
        assert_eq!(settings.ollama_base_url, "http://localhost:11434");
        assert_eq!(settings.translation_model, "aya:8b");
        assert!((settings.chat_temperature - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn home_settings_file_is_seeded() {
        with_temp_home(|home| {
            let settings = load_settings(None).unwrap();
            assert!(home.join(".transly/settings.toml").exists());
            assert_eq!(settings.listen, "0.0.0.0:8000");
        });
    }

    #[test]
    fn missing_extra_settings_path_is_an_error() {
        with_temp_home(|_| {
            let err = load_settings(Some(Path::new("/nonexistent/transly.toml"))).unwrap_err();
            assert!(err.to_string().contains("settings file not found"));
        });
    }
}
