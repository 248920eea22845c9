//! Sentence splitting and first-letter case helpers.

/// Split `text` after `.`, `!` or `?` when followed by whitespace. Returns
/// trimmed, non-empty sentences; a trailing fragment without terminal
/// punctuation is kept as the last sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        let is_terminal = matches!(bytes[i], b'.' | b'!' | b'?');
        if is_terminal && i + 1 < bytes.len() && bytes[i + 1].is_ascii_whitespace() {
            let end = i + 1; // include the terminal punctuation
            let s = text[start..end].trim();
            if !s.is_empty() {
                sentences.push(s.to_string());
            }
            start = end;
        }
        i += 1;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

pub fn word_count(sentence: &str) -> usize {
    sentence.split_whitespace().count()
}

/// Lower-case the first letter so the sentence can follow a lead-in phrase.
/// Leaves "I", "I'm" and acronyms ("NASA", "AI") alone.
pub fn lower_first(sentence: &str) -> String {
    let first_word = sentence.split_whitespace().next().unwrap_or("");
    let letters: Vec<char> = first_word.chars().filter(|c| c.is_alphabetic()).collect();
    let is_pronoun_i = first_word == "I" || first_word.starts_with("I'");
    let is_acronym = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
    if is_pronoun_i || is_acronym {
        return sentence.to_string();
    }

    let mut chars = sentence.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn capitalize_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split at the first comma that ends a clause: one followed by whitespace.
/// Commas inside numbers ("2,500") never qualify. Returns the text before
/// the comma and the text after it, whitespace included.
pub fn clause_comma(sentence: &str) -> Option<(&str, &str)> {
    sentence.match_indices(',').find_map(|(i, _)| {
        let after = &sentence[i + 1..];
        after
            .starts_with(char::is_whitespace)
            .then(|| (&sentence[..i], after))
    })
}

/// Split off trailing `.`, `!` or `?` (one or more). Returns (body, terminal).
pub fn split_terminal(sentence: &str) -> (&str, &str) {
    let trimmed = sentence.trim_end();
    let body = trimmed.trim_end_matches(['.', '!', '?']);
    (body, &trimmed[body.len()..])
}
