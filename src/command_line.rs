//! Command line reconstruction and environment-variable expansion

use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

static NEEDS_QUOTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s|\*|\?").expect("static regex"));

static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+|\{[^}]*\})").expect("static regex"));

/// Quote a single word so the command line can be pasted back into a shell.
///
/// Words containing whitespace, `*` or `?` are wrapped in single quotes; if the
/// word itself contains a single quote, double quotes are used instead and any
/// double quotes inside are turned into single quotes.
pub fn quote_word(word: &str) -> String {
    if !NEEDS_QUOTING.is_match(word) {
        return word.to_string();
    }
    if word.contains('\'') {
        format!("\"{}\"", word.replace('"', "'"))
    } else {
        format!("'{}'", word)
    }
}

/// Join words into a command line with the necessary quoting
///
/// ```
/// use cmd_helper::cmd_line;
///
/// let line = cmd_line(["/usr/bin/backup", "--name", "my docs", "*.txt"], true);
/// assert_eq!(line, "backup --name 'my docs' '*.txt'");
/// ```
pub fn cmd_line<I, S>(words: I, use_basename: bool) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .enumerate()
        .map(|(index, word)| {
            let word = word.as_ref();
            if index == 0 && use_basename {
                let base = Path::new(word)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| word.to_string());
                quote_word(&base)
            } else {
                quote_word(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Command line of the running program
pub fn current_cmd_line(use_basename: bool) -> String {
    cmd_line(std::env::args(), use_basename)
}

/// Replace `$NAME` and `${NAME}` with environment values; unknown names stay as written
pub fn expand_vars(text: &str) -> String {
    expand_vars_with(text, |name| std::env::var(name).ok())
}

/// Like [`expand_vars`], with an explicit lookup
pub fn expand_vars_with<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_REFERENCE
        .replace_all(text, |caps: &Captures<'_>| {
            let reference = &caps[1];
            let name = reference
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
                .unwrap_or(reference);
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
