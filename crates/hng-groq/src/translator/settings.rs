use std::str::FromStr;

use serde_json::Value;
use tracing::warn;

use hng_core::{KeyValueStore, StoreError, StoreMap};
use hng_model::{TranslationSettings, keys};

/// Read translation settings; missing or unknown values fall back to defaults.
pub(crate) async fn load(store: &dyn KeyValueStore) -> Result<TranslationSettings, StoreError> {
    let saved = store
        .get(&[keys::TRANSLATION_STYLE, keys::LANGUAGE_LEVEL, keys::TRANSLATION_MODE])
        .await?;
    Ok(TranslationSettings {
        style: field(&saved, keys::TRANSLATION_STYLE),
        level: field(&saved, keys::LANGUAGE_LEVEL),
        mode: field(&saved, keys::TRANSLATION_MODE),
    })
}

/// Write all settings as one unit.
pub(crate) async fn save(
    store: &dyn KeyValueStore,
    settings: &TranslationSettings,
) -> Result<(), StoreError> {
    let mut entries = StoreMap::new();
    entries.insert(keys::TRANSLATION_STYLE.into(), serde_json::to_value(settings.style)?);
    entries.insert(keys::LANGUAGE_LEVEL.into(), serde_json::to_value(settings.level)?);
    entries.insert(keys::TRANSLATION_MODE.into(), serde_json::to_value(settings.mode)?);
    store.set(entries).await
}

fn field<T>(saved: &StoreMap, key: &str) -> T
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    match saved.get(key) {
        Some(Value::String(raw)) => raw.parse().unwrap_or_else(|e| {
            warn!(key, value = %raw, error = %e, "ignoring unknown setting value");
            T::default()
        }),
        _ => T::default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use hng_core::{MemoryStore, store::get_one};
    use hng_model::{LanguageLevel, TranslationMode, TranslationStyle};

    use super::*;

    #[tokio::test]
    async fn missing_keys_give_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load(&store).await.unwrap(), TranslationSettings::default());
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = MemoryStore::new();
        let settings = TranslationSettings {
            style: TranslationStyle::Casual,
            level: LanguageLevel::MoreEnglish,
            mode: TranslationMode::AllText,
        };
        save(&store, &settings).await.unwrap();

        assert_eq!(
            get_one(&store, keys::LANGUAGE_LEVEL).await.unwrap(),
            Some(json!("moreEnglish"))
        );
        assert_eq!(load(&store).await.unwrap(), settings);
    }

    #[tokio::test]
    async fn unknown_value_falls_back() {
        let store = MemoryStore::new();
        hng_core::store::set_one(&store, keys::TRANSLATION_STYLE, "klingon")
            .await
            .unwrap();
        assert_eq!(load(&store).await.unwrap().style, TranslationStyle::Hinglish);
    }
}
