//! System prompts per translation style and language level.
use hng_model::{LanguageLevel, TranslationSettings, TranslationStyle};

const ONLY_TRANSLATION: &str = "Only respond with the translated text, no explanations.";

/// Opening sentence naming the conversion performed by `style`.
fn task(style: TranslationStyle) -> &'static str {
    match style {
        TranslationStyle::Hinglish => {
            "You are a translator that converts English text to Hinglish (Hindi written in English letters). Keep the meaning exactly the same but make it sound natural in Hinglish."
        }
        TranslationStyle::Hindi => {
            "You are a translator that converts English text to Hindi (Devanagari script). Keep the meaning exactly the same but make it sound natural in Hindi."
        }
        TranslationStyle::Roman => {
            "You are a translator that converts Hindi text to Romanized Hindi (Hindi written in English letters). Keep the meaning exactly the same but make it sound natural."
        }
        TranslationStyle::Formal => {
            "You are a translator that converts English text to formal Hinglish (Hindi written in English letters). Keep the meaning exactly the same but make it sound professional and formal."
        }
        TranslationStyle::Casual => {
            "You are a translator that converts English text to casual Hinglish (Hindi written in English letters). Keep the meaning exactly the same but make it sound casual and conversational."
        }
    }
}

/// Word-balance instruction. Hindi and Roman targets are monolingual, so the level
/// selects register there instead of language mix.
fn balance(style: TranslationStyle, level: LanguageLevel) -> &'static str {
    match (style, level) {
        (TranslationStyle::Hindi, LanguageLevel::Balanced) => {
            "Use a balanced mix of formal and colloquial Hindi."
        }
        (TranslationStyle::Hindi, LanguageLevel::MoreHindi) => "Use more formal Hindi words.",
        (TranslationStyle::Hindi, LanguageLevel::MoreEnglish) => {
            "Use more colloquial Hindi words."
        }
        (TranslationStyle::Roman, LanguageLevel::Balanced) => {
            "Use a balanced mix of formal and colloquial words."
        }
        (TranslationStyle::Roman, LanguageLevel::MoreHindi) => "Use more formal words.",
        (TranslationStyle::Roman, LanguageLevel::MoreEnglish) => "Use more colloquial words.",
        (_, LanguageLevel::Balanced) => "Use a balanced mix of Hindi and English words.",
        (_, LanguageLevel::MoreHindi) => "Use more Hindi words than English.",
        (_, LanguageLevel::MoreEnglish) => "Use more English words than Hindi.",
    }
}

/// System prompt for translating text with the given settings.
pub fn translation_prompt(style: TranslationStyle, level: LanguageLevel) -> String {
    format!("{} {} {ONLY_TRANSLATION}", task(style), balance(style, level))
}

/// System prompt for explaining text with the given settings.
///
/// Only the Hindi style switches the explanation language; every other style explains in Hinglish.
pub fn explanation_prompt(style: TranslationStyle, level: LanguageLevel) -> String {
    let language = match style {
        TranslationStyle::Hindi => "Hindi",
        _ => "Hinglish",
    };
    let words = match level {
        LanguageLevel::MoreHindi => "more Hindi words",
        LanguageLevel::MoreEnglish => "more English words",
        LanguageLevel::Balanced => "a balanced mix of Hindi and English words",
    };
    format!(
        "You are an AI assistant that explains concepts in {language}. \
         Provide a clear and detailed explanation of the given text. \
         Make it easy to understand and use {words}. \
         Format your response in a clear, structured way with bullet points or short paragraphs. \
         Only respond with the explanation, no additional text."
    )
}

/// Shorthand for [`translation_prompt`] over stored settings.
pub fn for_translation(settings: &TranslationSettings) -> String {
    translation_prompt(settings.style, settings.level)
}

/// Shorthand for [`explanation_prompt`] over stored settings.
pub fn for_explanation(settings: &TranslationSettings) -> String {
    explanation_prompt(settings.style, settings.level)
}
