//! Localization: key → string lookup with a fallback language.
//!
//! All user-visible strings are resolved here.  Errors carry lookup keys as
//! their message (see [`crate::error`]); only the view turns keys into text.
//! Keys missing from the active language fall back to Russian (the default
//! language), and an unknown key renders as itself so a missing entry is
//! visible instead of blank.

/// Supported display languages.  Selected via `FEEDLOOP_LANG` (`ru`/`en`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Ru,
    En,
}

impl Lang {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "ru" => Some(Lang::Ru),
            "en" => Some(Lang::En),
            _ => None,
        }
    }
}

/// Key → string resolver for one session.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    lang: Lang,
}

impl Translator {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    /// Resolve a lookup key: active language, then the fallback language,
    /// then the key itself.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        match lookup(self.lang, key).or_else(|| lookup(Lang::Ru, key)) {
            Some(text) => text,
            None => key,
        }
    }
}

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    match lang {
        Lang::Ru => ru(key),
        Lang::En => en(key),
    }
}

fn ru(key: &str) -> Option<&'static str> {
    Some(match key {
        "feedback.rss_loaded" => "RSS успешно загружен",
        "feedback.errors.required_field" => "Не должно быть пустым",
        "feedback.errors.invalid_url" => "Ссылка должна быть валидным URL",
        "feedback.errors.existing_rss" => "RSS уже существует",
        "feedback.errors.invalid_rss" => "Ресурс не содержит валидный RSS",
        "feedback.errors.network_error" => "Ошибка сети",
        "feedback.errors.request_timed_out" => "Превышено время ожидания ответа",
        "news_feed.feeds" => "Фиды",
        "news_feed.posts" => "Посты",
        "news_feed.view" => "Просмотр",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    Some(match key {
        "feedback.rss_loaded" => "RSS loaded successfully",
        "feedback.errors.required_field" => "Must not be empty",
        "feedback.errors.invalid_url" => "The link must be a valid URL",
        "feedback.errors.existing_rss" => "RSS already exists",
        "feedback.errors.invalid_rss" => "The resource does not contain a valid RSS",
        "feedback.errors.network_error" => "Network error",
        "feedback.errors.request_timed_out" => "Request timed out",
        "news_feed.feeds" => "Feeds",
        "news_feed.posts" => "Posts",
        "news_feed.view" => "View",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_key_in_active_language() {
        let t = Translator::new(Lang::En);
        assert_eq!(t.t("feedback.errors.network_error"), "Network error");

        let t = Translator::new(Lang::Ru);
        assert_eq!(t.t("feedback.errors.network_error"), "Ошибка сети");
    }

    #[test]
    fn unknown_key_renders_as_itself() {
        let t = Translator::new(Lang::En);
        assert_eq!(t.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn every_error_key_is_present_in_both_languages() {
        let keys = [
            "feedback.rss_loaded",
            "feedback.errors.required_field",
            "feedback.errors.invalid_url",
            "feedback.errors.existing_rss",
            "feedback.errors.invalid_rss",
            "feedback.errors.network_error",
            "feedback.errors.request_timed_out",
            "news_feed.feeds",
            "news_feed.posts",
            "news_feed.view",
        ];
        for key in keys {
            assert!(ru(key).is_some(), "missing ru entry for {key}");
            assert!(en(key).is_some(), "missing en entry for {key}");
        }
    }

    #[test]
    fn lang_from_code() {
        assert_eq!(Lang::from_code("ru"), Some(Lang::Ru));
        assert_eq!(Lang::from_code("EN"), Some(Lang::En));
        assert_eq!(Lang::from_code("fr"), None);
        assert_eq!(Lang::default(), Lang::Ru);
    }
}
