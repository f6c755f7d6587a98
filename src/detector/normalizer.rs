use regex::Regex;
use std::sync::LazyLock;

// Case-insensitive so that lowercasing can never produce a fresh URL prefix.
static RE_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)http\S+|www\S+").ok());

static RE_EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\S+@\S+").ok());

static RE_NON_ALNUM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").ok());

fn apply(re: &LazyLock<Option<Regex>>, text: &str, rep: &str) -> String {
    match &**re {
        Some(re) => re.replace_all(text, rep).into_owned(),
        None => text.to_string(),
    }
}

/// Normalize English text the same way the training corpus was cleaned.
///
/// URLs and email-like tokens are dropped, anything outside `[a-zA-Z0-9]` and
/// whitespace becomes a space, the result is lowercased and whitespace runs are
/// collapsed to a single space. Empty input gives an empty string.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = apply(&RE_URL, text, "");
    let text = apply(&RE_EMAIL, &text, "");
    let text = apply(&RE_NON_ALNUM, &text, " ");
    let text = text.to_ascii_lowercase();

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
