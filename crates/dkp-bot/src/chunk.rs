//! Word-bounded splitting of long responses.
//!
//! Discord rejects messages over a fixed length. Responses are split between
//! words; inside a chunk the whitespace between words (including line breaks)
//! is kept as written.

use tracing::warn;

/// Split `text` into chunks of at most `limit` characters.
///
/// A word is never split, so a single word longer than `limit` becomes its own
/// oversized chunk. The iterator is lazy and consumed once.
pub fn chunk(text: &str, limit: usize) -> Chunks<'_> {
    Chunks { rest: text, limit }
}

/// Iterator returned by [`chunk`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    limit: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            self.rest = "";
            return None;
        }

        // Byte offset where the accepted text ends, and its length in chars.
        let mut end = 0;
        let mut used = 0;
        loop {
            let after = &rest[end..];
            let token_start = end + (after.len() - after.trim_start().len());
            if token_start >= rest.len() {
                break;
            }
            let token_end = rest[token_start..]
                .find(char::is_whitespace)
                .map_or(rest.len(), |i| token_start + i);

            let separator = rest[end..token_start].chars().count();
            let token = rest[token_start..token_end].chars().count();
            if end > 0 && used + separator + token > self.limit {
                break;
            }
            used += separator + token;
            end = token_end;
        }

        if used > self.limit {
            warn!(
                "Single word of {} chars exceeds message limit {}",
                used,
                self.limit
            );
        }

        self.rest = &rest[end..];
        Some(rest[..end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks: Vec<_> = chunk("hello world", 2000).collect();
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_empty_and_blank_text_yield_nothing() {
        assert_eq!(chunk("", 10).count(), 0);
        assert_eq!(chunk("  \n\t ", 10).count(), 0);
    }

    #[test]
    fn test_splits_between_words() {
        let chunks: Vec<_> = chunk("aaa bbb ccc ddd", 7).collect();
        assert_eq!(chunks, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_exact_fit_is_allowed() {
        let chunks: Vec<_> = chunk("abcd efgh", 9).collect();
        assert_eq!(chunks, vec!["abcd efgh"]);
        let chunks: Vec<_> = chunk("abcd efgh", 8).collect();
        assert_eq!(chunks, vec!["abcd", "efgh"]);
    }

    #[test]
    fn test_line_breaks_survive_inside_a_chunk() {
        let text = "Gruk(Officer):\t1200\nLight(Member):\t800\n";
        let chunks: Vec<_> = chunk(text, 2000).collect();
        assert_eq!(chunks, vec!["Gruk(Officer):\t1200\nLight(Member):\t800"]);
    }

    #[test]
    fn test_oversized_word_stands_alone() {
        let chunks: Vec<_> = chunk("a abcdefghij b", 5).collect();
        assert_eq!(chunks, vec!["a", "abcdefghij", "b"]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let chunks: Vec<_> = chunk("ééé ééé", 7).collect();
        assert_eq!(chunks, vec!["ééé ééé"]);
    }

    #[test]
    fn test_chunks_preserve_word_sequence_and_limit() {
        let text: String = (0..500)
            .map(|i| format!("word{} ", i % 37).repeat(1 + i % 3))
            .collect::<Vec<_>>()
            .join("\n");
        for limit in [10, 25, 80, 2000] {
            let chunks: Vec<_> = chunk(&text, limit).collect();
            for c in &chunks {
                assert!(c.chars().count() <= limit, "chunk over {limit}: {c:?}");
                assert_eq!(c.trim(), c.as_str());
            }
            let joined = chunks.join(" ");
            assert_eq!(words(&joined), words(&text));
        }
    }

    #[test]
    fn test_iterator_is_lazy() {
        let mut chunks = chunk("one two three", 3);
        assert_eq!(chunks.next().as_deref(), Some("one"));
        assert_eq!(chunks.next().as_deref(), Some("two"));
        assert_eq!(chunks.next().as_deref(), Some("three"));
        assert_eq!(chunks.next(), None);
        assert_eq!(chunks.next(), None);
    }
}
