use anyhow::{Result, anyhow};

use crate::languages::Lang;
use crate::providers::{Provider, ProviderUsage};

#[derive(Debug, Clone)]
pub struct Translator<P: Provider> {
    provider: P,
}

#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    pub text: String,
    pub model: Option<String>,
    pub usage: Option<ProviderUsage>,
}

/// System prompt for the translation model. The output-only contract
/// matters: chat models love to add commentary otherwise.
pub fn render_translation_prompt(source: Option<Lang>, target: Lang) -> String {
    let mut prompt = String::from(
        "You are a translation engine for Nepali, Sinhala and English.\n",
    );
    match source {
        Some(source) if source != target => {
            prompt.push_str(&format!(
                "Translate the user's text from {} into {}.\n",
                source.label(),
                target.label()
            ));
        }
        Some(_) => {
            prompt.push_str(&format!(
                "The text is already {}; repeat it unchanged unless it contains another language.\n",
                target.label()
            ));
        }
        None => {
            prompt.push_str(&format!(
                "Detect the language of the user's text and translate it into {}.\n",
                target.label()
            ));
        }
    }
    prompt.push_str(
        "Respond with the translated text only: no explanations, no quotes, \
         no transliteration notes. Preserve numbers, proper names and line breaks.",
    );
    prompt
}

impl<P: Provider> Translator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn translate(
        &self,
        text: &str,
        source: Option<Lang>,
        target: Lang,
    ) -> Result<ExecutionOutput> {
        let text = text.trim();
        if text.is_empty() {
            return Err(anyhow!("nothing to translate"));
        }

        let response = self
            .provider
            .clone()
            .append_system_input(render_translation_prompt(source, target))
            .append_user_input(text.to_string())
            .complete()
            .await?;

        let translated = response.text.trim().to_string();
        if translated.is_empty() {
            return Err(anyhow!("translation returned empty text"));
        }
        Ok(ExecutionOutput {
            text: translated,
            model: response.model,
            usage: response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderFuture, ProviderResponse};

    #[derive(Clone)]
    struct TestProvider {
        reply: String,
        system: std::sync::Arc<std::sync::Mutex<String>>,
    }

    impl Provider for TestProvider {
        fn append_system_input(self, input: String) -> Self {
            *self.system.lock().unwrap() = input;
            self
        }

        fn append_user_input(self, _input: String) -> Self {
            self
        }

        fn complete(self) -> ProviderFuture {
            let reply = self.reply;
            Box::pin(async move {
                Ok(ProviderResponse {
                    text: reply,
                    model: Some("test".to_string()),
                    usage: None,
                })
            })
        }
    }

    fn translator(reply: &str) -> (Translator<TestProvider>, std::sync::Arc<std::sync::Mutex<String>>) {
        let system = std::sync::Arc::new(std::sync::Mutex::new(String::new()));
        let provider = TestProvider {
            reply: reply.to_string(),
            system: system.clone(),
        };
        (Translator::new(provider), system)
    }

    #[tokio::test]
    async fn translates_and_trims() {
        let (translator, system) = translator("  काठमाडौँ  ");
        let output = translator
            .translate("Kathmandu", Some(Lang::En), Lang::Ne)
            .await
            .unwrap();
        assert_eq!(output.text, "काठमाडौँ");
        assert_eq!(output.model.as_deref(), Some("test"));
        let prompt = system.lock().unwrap().clone();
        assert!(prompt.contains("from English into Nepali"));
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let (translator, _) = translator("x");
        assert!(translator.translate("   ", None, Lang::En).await.is_err());
    }

    #[tokio::test]
    async fn empty_model_output_is_an_error() {
        let (translator, _) = translator("   ");
        let err = translator
            .translate("hello", None, Lang::Ne)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty text"));
    }

    #[test]
    fn prompt_variants() {
        let auto = render_translation_prompt(None, Lang::En);
        assert!(auto.contains("Detect the language"));
        let same = render_translation_prompt(Some(Lang::En), Lang::En);
        assert!(same.contains("already English"));
        let fixed = render_translation_prompt(Some(Lang::Si), Lang::En);
        assert!(fixed.contains("from Sinhala into English"));
    }
}
