//! Translation loader and i18n management
//!
//! Translations ship inside the binary and can be overridden per language from
//! a directory of `<lang>.json` files at startup.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::I18nConfig;
use crate::utils::errors::{Result, UiBotError};

const EMBEDDED: &[(&str, &str)] = &[
    ("ru", include_str!("../../translations/ru.json")),
    ("en", include_str!("../../translations/en.json")),
];

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language code
    translations: HashMap<String, Map<String, Value>>,
    /// Default language code
    default_language: String,
    /// Supported language codes
    supported_languages: Vec<String>,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

/// Build [`TranslationParams`] from key/value pairs
pub fn params<const N: usize>(pairs: [(&str, String); N]) -> TranslationParams {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

impl I18n {
    /// Create an instance holding the built-in translations
    pub fn new(config: &I18nConfig) -> Result<Self> {
        let mut i18n = Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
        };

        for (lang_code, content) in EMBEDDED {
            if i18n.is_language_supported(lang_code) {
                i18n.insert_language(lang_code, content)?;
            }
        }

        if !i18n.translations.contains_key(&i18n.default_language) {
            return Err(UiBotError::Config(format!(
                "No translations for default language '{}'",
                i18n.default_language
            )));
        }

        Ok(i18n)
    }

    /// Replace built-in translations with files found in `dir`
    pub async fn load_overrides(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            warn!("Translations directory not found: {}", dir.display());
            return Ok(());
        }

        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = dir.join(format!("{}.json", lang_code));
            if !file_path.exists() {
                continue;
            }

            let content = fs::read_to_string(&file_path).await?;
            self.insert_language(lang_code, &content)?;
            info!("Loaded translation overrides for language: {}", lang_code);
        }

        Ok(())
    }

    fn insert_language(&mut self, lang_code: &str, content: &str) -> Result<()> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(map) => {
                debug!("Loaded {} top-level translation keys for {}", map.len(), lang_code);
                self.translations.insert(lang_code.to_string(), map);
                Ok(())
            }
            _ => Err(UiBotError::Config(format!(
                "Invalid translation file format for {}",
                lang_code
            ))),
        }
    }

    /// Get a translated message
    ///
    /// Falls back to the default language, then to the key itself.
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.get_effective_language(lang);

        let text = self
            .get_translation_value(key, effective_lang)
            .or_else(|| self.get_translation_value(key, &self.default_language));

        match text {
            Some(text) => self.format_message(text, params),
            None => {
                warn!("Translation key '{}' not found in any language", key);
                key.to_string()
            }
        }
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    fn get_effective_language<'a>(&'a self, lang: &'a str) -> &'a str {
        if self.translations.contains_key(lang) {
            lang
        } else {
            &self.default_language
        }
    }

    /// Get translation text from nested JSON structure
    fn get_translation_value(&self, key: &str, lang: &str) -> Option<&str> {
        let translations = self.translations.get(lang)?;

        // Nested keys like "screens.home.title"
        let mut parts = key.split('.');
        let mut current = translations.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }

        current.as_str()
    }

    fn format_message(&self, template: &str, params: Option<&TranslationParams>) -> String {
        match params {
            Some(params) => params.iter().fold(template.to_string(), |text, (key, value)| {
                text.replace(&format!("{{{}}}", key), value)
            }),
            None => template.to_string(),
        }
    }

    /// Get supported languages
    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    /// Get default language
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Number of leaf keys per loaded language
    pub fn get_stats(&self) -> TranslationStats {
        let languages = self
            .translations
            .iter()
            .map(|(lang, map)| (lang.clone(), map.values().map(count_leaves).sum()))
            .collect();

        TranslationStats {
            default_language: self.default_language.clone(),
            languages,
        }
    }
}

fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(count_leaves).sum(),
        _ => 1,
    }
}

/// Translation statistics
#[derive(Debug, Clone)]
pub struct TranslationStats {
    pub default_language: String,
    pub languages: HashMap<String, usize>,
}
