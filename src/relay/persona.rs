//! System persona selection and rendering.

use serde_json::Value;

use crate::relay::render::stringify;

const PERSONA_ES: &str = "Eres Damian.AI. Responde breve y orientado a negocio para PYMEs suizas.";
const PERSONA_DE: &str =
    "Du bist Damian.AI. Antworte kurz, geschäftsnah, mit Fokus auf Schweizer KMU.";
const PERSONA_EN: &str = "You are Damian.AI. Answer concisely, business-focused, for Swiss SMEs.";

/// Persona language. Anything unrecognised falls back to Spanish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Es,
    De,
    En,
}

impl Lang {
    /// Exact match on the wire code; no case folding.
    pub fn from_code(code: &str) -> Self {
        match code {
            "de" => Lang::De,
            "en" => Lang::En,
            _ => Lang::Es,
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Lang::Es => PERSONA_ES,
            Lang::De => PERSONA_DE,
            Lang::En => PERSONA_EN,
        }
    }
}

/// Render the system instruction sent ahead of the user prompt.
pub fn system_persona_text(lang: Lang, profile: &Value, mini_bio: &str) -> String {
    format!(
        "{}\nPerfil: {}\nMiniBio: {}",
        lang.template(),
        stringify(profile),
        mini_bio
    )
}
