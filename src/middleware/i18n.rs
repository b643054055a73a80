// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LANG;

// Extrator de idioma (Accept-Language). Guarda só o subtag primário: "pt-BR" -> "pt".
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    pub fn lang(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(primary_language)
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Ok(Locale(lang))
    }
}

fn primary_language(header_str: &str) -> Option<String> {
    accept_language::parse(header_str)
        .first()
        .and_then(|tag| tag.split('-').next())
        .filter(|lang| !lang.is_empty())
        .map(|lang| lang.to_ascii_lowercase())
}
