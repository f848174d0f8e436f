//! Internationalization (i18n) support
//!
//! Spanish and English strings are compiled in; a `languages_dir` may add
//! languages or override keys with `<lang>.yml` files.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::helpers::DateNames;

const BUILTIN: [(&str, &str); 2] = [
    ("es", include_str!("languages/es.yml")),
    ("en", include_str!("languages/en.yml")),
];

type Table = HashMap<String, serde_yaml::Value>;

/// Internationalization handler
pub struct I18n {
    /// Current language, lowercase (`es-ar`)
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, Table>,
}

impl I18n {
    /// Create a new i18n handler without any strings loaded
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            translations: HashMap::new(),
        }
    }

    /// Create a handler with the compiled-in languages loaded
    pub fn builtin(language: &str) -> Result<Self> {
        let mut i18n = Self::new(language);
        for (lang, source) in BUILTIN {
            i18n.load_str(lang, source)?;
        }
        Ok(i18n)
    }

    /// Merge a YAML document into the table of `lang`
    pub fn load_str(&mut self, lang: &str, source: &str) -> Result<()> {
        let data: Table = serde_yaml::from_str(source)?;
        let table = self.translations.entry(lang.to_lowercase()).or_default();
        for (key, value) in data {
            merge_value(table, key, value);
        }
        Ok(())
    }

    /// Load language files from a directory
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path)?;
            match self.load_str(lang, &content) {
                Ok(()) => tracing::debug!("Loaded language file: {:?}", path),
                Err(e) => tracing::warn!("Failed to parse language file {:?}: {}", path, e),
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key, nested keys joined by dots ("home.empty")
    pub fn get(&self, key: &str) -> String {
        self.lookup(key)
            .map(yaml_value_to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Get a translation with `%s` replaced by `arg`
    pub fn format(&self, key: &str, arg: &str) -> String {
        self.get(key).replace("%s", arg)
    }

    /// Get a list of strings, empty when the key is missing or not a list
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.lookup(key) {
            Some(serde_yaml::Value::Sequence(items)) => {
                items.iter().map(yaml_value_to_string).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Weekday and month names of the current language
    pub fn date_names(&self) -> DateNames {
        DateNames {
            weekdays: self.get_list("date.weekdays"),
            months: self.get_list("date.months"),
            pattern: self
                .lookup("date.long")
                .map(yaml_value_to_string)
                .unwrap_or_default(),
        }
    }

    /// Get all translations for the current language as a flat HashMap
    /// This flattens nested keys using dot notation (e.g., "home.empty")
    pub fn get_all_translations(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();

        // Most specific language wins
        for lang in self.candidates().iter().rev() {
            if let Some(data) = self.translations.get(lang) {
                flatten_translations(data, "", &mut result);
            }
        }

        result
    }

    /// Languages to search, most specific first: "es-ar", "es", then "en"
    fn candidates(&self) -> Vec<String> {
        let mut langs = vec![self.language.clone()];
        if let Some((base, _)) = self.language.split_once('-') {
            langs.push(base.to_string());
        }
        if !langs.iter().any(|l| l == "en") {
            langs.push("en".to_string());
        }
        langs
    }

    fn lookup(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.candidates().iter().find_map(|lang| {
            self.translations
                .get(lang)
                .and_then(|data| get_nested_value(data, key))
        })
    }
}

/// Merge `value` into `table`; mappings merge one level deep so override
/// files only need the keys they change
fn merge_value(table: &mut Table, key: String, value: serde_yaml::Value) {
    if let serde_yaml::Value::Mapping(incoming) = &value {
        if let Some(serde_yaml::Value::Mapping(existing)) = table.get_mut(&key) {
            for (k, v) in incoming {
                existing.insert(k.clone(), v.clone());
            }
            return;
        }
    }
    table.insert(key, value);
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(data: &'a Table, key: &str) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?);

    for part in parts {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(serde_yaml::Value::String(part.to_string()));
            }
            _ => return None,
        }
    }

    current
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

/// Flatten translations into a HashMap with dot-notation keys
fn flatten_translations(data: &Table, prefix: &str, result: &mut HashMap<String, String>) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                let nested: Table = map
                    .iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            serde_yaml::Value::Sequence(_) => {}
            _ => {
                result.insert(full_key, yaml_value_to_string(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_spanish() {
        let i18n = I18n::builtin("es-AR").unwrap();
        assert_eq!(i18n.language(), "es-ar");
        assert_eq!(i18n.get("home.empty"), "No se cargaron los posts :/");
        assert_eq!(i18n.get("post.open"), "Ver post");
    }

    #[test]
    fn test_fallback_to_english_then_key() {
        let mut i18n = I18n::builtin("fr").unwrap();
        assert_eq!(i18n.get("listing.empty"), "No posts yet");
        assert_eq!(i18n.get("missing.key"), "missing.key");

        i18n.load_str("fr", "listing:\n  empty: Pas encore de posts\n")
            .unwrap();
        assert_eq!(i18n.get("listing.empty"), "Pas encore de posts");
        assert_eq!(i18n.get("listing.back"), "Go back to start");
    }

    #[test]
    fn test_override_merges_nested_keys() {
        let mut i18n = I18n::builtin("es").unwrap();
        i18n.load_str("es", "home:\n  heading: Mi blog\n").unwrap();
        assert_eq!(i18n.get("home.heading"), "Mi blog");
        assert_eq!(i18n.get("home.empty"), "No se cargaron los posts :/");
    }

    #[test]
    fn test_format() {
        let i18n = I18n::builtin("en").unwrap();
        assert_eq!(i18n.format("post.image_alt", "Hello"), "Image of Hello");
    }

    #[test]
    fn test_date_names() {
        let names = I18n::builtin("es-ar").unwrap().date_names();
        assert!(names.is_complete());
        assert_eq!(names.months[0], "enero");
        assert_eq!(names.weekdays[6], "domingo");
    }

    #[test]
    fn test_get_all_translations() {
        let all = I18n::builtin("es-ar").unwrap().get_all_translations();
        assert_eq!(all.get("home.all_posts").unwrap(), "Todos los posts");
        assert!(!all.contains_key("date.months"));
    }

    #[test]
    fn test_load_languages_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("es.yml"), "post:\n  back: Atrás\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut i18n = I18n::builtin("es").unwrap();
        i18n.load_languages(dir.path()).unwrap();
        assert_eq!(i18n.get("post.back"), "Atrás");
        assert_eq!(i18n.get("post.open"), "Ver post");
    }
}
