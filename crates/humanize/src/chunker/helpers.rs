//! Word-level utilities shared by the chunker.

/// Approximate token count via whitespace splitting.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The last `overlap_words` words of `text`, space-joined. Clamps to the whole
/// text when it is shorter than the overlap.
pub fn overlap_text(text: &str, overlap_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= overlap_words {
        return words.join(" ");
    }
    words[words.len() - overlap_words..].join(" ")
}
