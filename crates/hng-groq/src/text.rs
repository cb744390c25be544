//! Text helpers applied around remote translation.

/// Devanagari block, U+0900..=U+097F.
fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// `true` when `input` mixes Devanagari and ASCII Latin letters.
///
/// # Examples
/// ```
/// use hng_groq::text::is_code_mixed;
///
/// assert!(is_code_mixed("mera नाम"));
/// assert!(!is_code_mixed("only english"));
/// ```
pub fn is_code_mixed(input: &str) -> bool {
    input.chars().any(is_devanagari) && input.chars().any(|c| c.is_ascii_alphabetic())
}

/// Insert a space wherever a Latin run is glued directly to a following Devanagari run.
///
/// Text that is not code-mixed is returned unchanged.
///
/// # Examples
/// ```
/// use hng_groq::text::preprocess;
///
/// assert_eq!(preprocess("helloनमस्ते"), "hello नमस्ते");
/// ```
pub fn preprocess(input: &str) -> String {
    if !is_code_mixed(input) {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len() + 8);
    let mut prev_latin = false;
    for c in input.chars() {
        if prev_latin && is_devanagari(c) {
            out.push(' ');
        }
        prev_latin = c.is_ascii_alphabetic();
        out.push(c);
    }
    out
}

const OFFLINE_DICTIONARY: &[(&str, &str)] = &[
    ("hello", "नमस्ते"),
    ("how are you", "आप कैसे हैं"),
    ("goodbye", "अलविदा"),
    ("i am fine", "मैं ठीक हूँ"),
    ("thank you", "धन्यवाद"),
    ("yes", "हाँ"),
    ("no", "नहीं"),
    ("please", "कृपया"),
    ("sorry", "माफ़ कीजिए"),
    ("what", "क्या"),
    ("where", "कहाँ"),
    ("when", "कब"),
];

/// Last-resort translation of a few common phrases, matched case-insensitively on the trimmed input.
///
/// # Examples
/// ```
/// use hng_groq::text::offline_translate;
///
/// assert_eq!(offline_translate(" Thank you "), Some("धन्यवाद"));
/// assert_eq!(offline_translate("good morning"), None);
/// ```
pub fn offline_translate(input: &str) -> Option<&'static str> {
    let needle = input.trim().to_lowercase();
    OFFLINE_DICTIONARY
        .iter()
        .find(|(phrase, _)| *phrase == needle)
        .map(|(_, translation)| *translation)
}

/// Whether a page fragment is worth sending for translation.
///
/// After trimming, skips fragments shorter than two characters, pure digit runs, and
/// fragments wrapped in `{..}` or `[..]` (usually code or templating).
///
/// # Examples
/// ```
/// use hng_groq::text::is_translatable_text;
///
/// assert!(is_translatable_text("42 apples"));
/// assert!(!is_translatable_text(" 2024 "));
/// assert!(!is_translatable_text("{{ user.name }}"));
/// ```
pub fn is_translatable_text(text: &str) -> bool {
    let text = text.trim();
    if text.chars().count() < 2 || text.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let wrapped = |open: char, close: char| text.starts_with(open) && text.ends_with(close);
    !(wrapped('{', '}') || wrapped('[', ']'))
}
