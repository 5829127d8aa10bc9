/// Default maximum number of words sent to the model in one summary request
pub const DEFAULT_CHUNK_WORDS: usize = 2000;

/// Split text into consecutive groups of at most `max_words` whitespace-delimited words.
///
/// Each group is rejoined with single spaces, so joining the chunks with a space
/// reproduces the whitespace-normalized input. Words are never split. A
/// `max_words` of 0 is treated as 1.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(max_words.max(1)).map(|group| group.join(" ")).collect()
}
