//! Rule-based preparation for the standard tier: one generation call for the
//! whole document, no chunking, enhancement or fidelity gate.

use crate::normalizer::strip_boilerplate;
use crate::sentences::split_sentences;

/// Sentences above this many words are broken in two before generation.
pub const LONG_SENTENCE_WORDS: usize = 25;

/// Strip boilerplate, then break overly long sentences.
pub fn prepare(text: &str) -> String {
    break_long_sentences(&strip_boilerplate(text), LONG_SENTENCE_WORDS)
}

/// Break every sentence longer than `max_words` at its midpoint word, ending
/// the first half with a comma. Sentences are re-joined with single spaces.
pub fn break_long_sentences(text: &str, max_words: usize) -> String {
    let mut out: Vec<String> = Vec::new();
    for sentence in split_sentences(text) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.len() <= max_words {
            out.push(sentence);
            continue;
        }
        let mid = words.len() / 2;
        let head = words[..mid].join(" ");
        let head = if head.ends_with([',', ';', ':']) { head } else { format!("{head},") };
        out.push(head);
        out.push(words[mid..].join(" "));
    }
    out.join(" ")
}
