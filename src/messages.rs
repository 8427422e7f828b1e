//! User-facing strings for the form and the modal.
//!
//! The upload page was written for a Portuguese-speaking audience, so
//! [`Locale::PtBr`] is the default. Templates use a single `{}` placeholder.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language of the user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// Brazilian Portuguese (default).
    #[default]
    PtBr,
    /// English.
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pt" | "pt-br" => Ok(Locale::PtBr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}' (expected pt-br or en)")),
        }
    }
}

/// The fixed message set for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    file_selected: &'static str,
    pub fill_all_fields: &'static str,
    pub success: &'static str,
    request_failed: &'static str,
    pub error_not_informed: &'static str,
}

const PT_BR: Messages = Messages {
    file_selected: "Arquivo selecionado: {}",
    fill_all_fields: "Preencha todos os campos antes de enviar.",
    success: "Tudo certo! Seu modelo já está sendo gerado. Aguarde nosso email!",
    request_failed: "Oops! O seguinte erro ocorreu durante a requisição: {}",
    error_not_informed: "Erro não informado.",
};

const EN: Messages = Messages {
    file_selected: "File selected: {}",
    fill_all_fields: "Fill in all fields before submitting.",
    success: "All set! Your model is being generated. Watch your inbox!",
    request_failed: "Oops! The following error occurred during the request: {}",
    error_not_informed: "Error not informed.",
};

impl Messages {
    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::PtBr => &PT_BR,
            Locale::En => &EN,
        }
    }

    /// Filename label text for a freshly selected file.
    pub fn file_selected(&self, name: &str) -> String {
        self.file_selected.replacen("{}", name, 1)
    }

    /// Fail-modal text for a rejected request.
    ///
    /// `server_error` is the `erro` field of the response body when the
    /// server sent one.
    pub fn request_failed(&self, server_error: Option<&str>) -> String {
        let detail = server_error.unwrap_or(self.error_not_informed);
        self.request_failed.replacen("{}", detail, 1)
    }
}
