//! Language decision: country code plus `Accept-Language` to one of a
//! closed set of language codes.
//!
//! The decision is derived fresh per request and never cached. Priority is
//! strict: the resolved country wins over anything in the header, and the
//! header wins over the fallback. Signals are never merged.

/// A language from the closed supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Russian,
}

impl Language {
    /// ISO 639-1 code, suitable for the `X-Detected-Language` header.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }
}

/// Decision tables for language resolution.
///
/// Injected into the resolver at construction so tests can substitute
/// alternate tables without process-wide side effects.
#[derive(Debug, Clone)]
pub struct LanguageRules {
    /// Country codes treated as predominantly Russian-speaking. Compared
    /// case-sensitively: `GeoResolver` already guarantees uppercase.
    pub russian_speaking: &'static [&'static str],
    /// Returned when neither the country nor the header decides.
    pub fallback: Language,
}

impl Default for LanguageRules {
    fn default() -> Self {
        Self {
            russian_speaking: &["RU", "BY", "KZ", "KG", "TJ", "UZ", "MD"],
            fallback: Language::English,
        }
    }
}

/// Resolves a per-request language from geo and header signals.
#[derive(Debug, Clone, Default)]
pub struct LanguageResolver {
    rules: LanguageRules,
}

impl LanguageResolver {
    /// Create a resolver with specific decision tables.
    pub fn new(rules: LanguageRules) -> Self {
        Self { rules }
    }

    /// Decide the language for one request.
    ///
    /// Total function: always returns a member of the closed set.
    ///
    /// # Arguments
    /// * `country` - The resolved country code (uppercase, always present)
    /// * `accept_language` - Raw `Accept-Language` header value, if any
    ///
    /// # Algorithm
    /// 1. Country in the Russian-speaking set → Russian, regardless of
    ///    header content.
    /// 2. Any header entry whose tag (before `;`, trimmed, lowercased)
    ///    starts with `ru` → Russian.
    /// 3. Otherwise the fallback.
    pub fn resolve(&self, country: &str, accept_language: Option<&str>) -> Language {
        if self.rules.russian_speaking.iter().any(|c| *c == country) {
            return Language::Russian;
        }

        if let Some(header) = accept_language {
            for entry in header.split(',') {
                // "ru-RU;q=0.9" -> "ru-ru"; malformed entries simply fail
                // the prefix check and are skipped.
                let tag = entry.split(';').next().unwrap_or(entry).trim().to_lowercase();
                if tag.starts_with("ru") {
                    return Language::Russian;
                }
            }
        }

        self.rules.fallback
    }
}
