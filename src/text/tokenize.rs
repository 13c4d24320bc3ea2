//! Word tokenization and n-gram expansion.

/// Splits text into word tokens of at least two word characters.
///
/// A word character is alphanumeric or `_`; every other character is a
/// separator, so `"let's"` yields only `"let"`.
pub fn words(text: &str, lowercase: bool) -> Vec<String> {
    let text = if lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            current.push(c);
        } else {
            flush(&mut current, &mut tokens);
        }
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if current.chars().count() >= 2 {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Expands tokens into space-joined n-grams for every `n` in `min_n..=max_n`.
pub fn ngrams(tokens: &[String], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut out = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n == 1 {
            out.extend(tokens.iter().cloned());
            continue;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}
