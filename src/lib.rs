pub mod chatbot;
pub mod languages;
pub mod logging;
pub mod ocr;
pub mod payload;
pub mod pdf;
pub mod providers;
pub mod server;
pub mod settings;
pub mod speech;
pub mod translator;

#[cfg(test)]
mod test_util;

pub use providers::{Ollama, Provider, ProviderResponse, ProviderUsage};
pub use translator::{ExecutionOutput, Translator};
