//! Text helpers for message delivery and logging.
//!
//! - Splitting long reports into chat-sized chunks
//! - Grouping lines into request-sized pieces for translation
//! - Truncating long strings before they go into a log line

/// Split `text` into consecutive chunks of at most `max_chars` characters.
///
/// Lengths are counted in Unicode scalar values, so a chunk never ends in the
/// middle of a character. Concatenating the chunks yields `text` again. Empty
/// text produces no chunks; a `max_chars` of zero keeps the text whole.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(chunk_message("abcde", 2), vec!["ab", "cd", "e"]);
/// ```
pub fn chunk_message(text: &str, max_chars: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if max_chars == 0 {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);
    chunks
}

/// A run of text produced by [`pack_lines`].
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    /// What followed `text` in the source: `"\n"` when the piece ended at a
    /// line break, `""` when a long line was cut or the text ended.
    pub separator: &'static str,
}

/// Group the lines of `text` into pieces of at most `max_chars` characters.
///
/// Lines are kept whole where possible. A single line longer than the limit
/// is cut with [`chunk_message`]; its last part starts the next piece.
///
/// # Arguments
///
/// * `text` - The text to split, usually a whole report
/// * `max_chars` - Longest piece in characters; `0` keeps the text whole
///
/// # Returns
///
/// The pieces in order. Appending each piece's `text` and `separator`
/// rebuilds `text` exactly, blank lines included.
pub fn pack_lines(text: &str, max_chars: usize) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;
    // `current` holds at least one line, which may be empty
    let mut open = false;

    for line in text.split('\n') {
        let line_chars = line.chars().count();

        if open {
            // +1 for the newline that joins this line to the previous one
            if max_chars > 0 && current_chars + 1 + line_chars > max_chars {
                pieces.push(Piece {
                    text: std::mem::take(&mut current),
                    separator: "\n",
                });
                current_chars = 0;
            } else {
                current.push('\n');
                current_chars += 1;
            }
        }

        if max_chars > 0 && line_chars > max_chars {
            let mut parts = chunk_message(line, max_chars);
            let tail = parts.pop().unwrap_or_default();
            pieces.extend(parts.into_iter().map(|part| Piece {
                text: part.to_string(),
                separator: "",
            }));
            current.push_str(tail);
            current_chars = tail.chars().count();
        } else {
            current.push_str(line);
            current_chars += line_chars;
        }
        open = true;
    }

    if open {
        pieces.push(Piece {
            text: current,
            separator: "",
        });
    }
    pieces
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the bytes left out.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_message_9000_chars() {
        let text = "x".repeat(9000);
        let chunks = chunk_message(&text, 4000);
        let lengths: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(lengths, vec![4000, 4000, 1000]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_chunk_message_short_and_exact() {
        assert_eq!(chunk_message("hello", 4000), vec!["hello"]);
        let exact = "y".repeat(4000);
        assert_eq!(chunk_message(&exact, 4000).len(), 1);
    }

    #[test]
    fn test_chunk_message_multibyte() {
        let text = "Новини".repeat(3); // 18 chars, 36 bytes
        let chunks = chunk_message(&text, 5);
        assert_eq!(chunks.len(), 4);
        assert!(chunks[..3].iter().all(|c| c.chars().count() == 5));
        assert_eq!(chunks.concat(), text);

        let emoji = "📰a📰b📰";
        assert_eq!(chunk_message(emoji, 2), vec!["📰a", "📰b", "📰"]);
    }

    #[test]
    fn test_chunk_message_empty_and_zero() {
        assert!(chunk_message("", 10).is_empty());
        assert_eq!(chunk_message("abc", 0), vec!["abc"]);
    }

    fn rejoin(pieces: &[Piece]) -> String {
        pieces.iter().map(|p| format!("{}{}", p.text, p.separator)).collect()
    }

    fn texts(pieces: &[Piece]) -> Vec<&str> {
        pieces.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn test_pack_lines_groups_whole_lines() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(texts(&pack_lines(text, 9)), vec!["aaaa\nbbbb", "cccc"]);
        assert_eq!(texts(&pack_lines(text, 100)), vec![text]);
        assert_eq!(texts(&pack_lines(text, 0)), vec![text]);
    }

    #[test]
    fn test_pack_lines_cuts_oversized_line() {
        let text = "ab\ncdefghij\nk";
        let pieces = pack_lines(text, 4);
        assert_eq!(texts(&pieces), vec!["ab", "cdef", "ghij", "k"]);
        let separators: Vec<&str> = pieces.iter().map(|p| p.separator).collect();
        assert_eq!(separators, vec!["\n", "", "\n", ""]);
        assert_eq!(rejoin(&pieces), text);
    }

    #[test]
    fn test_pack_lines_cut_line_rejoins_without_newline() {
        let pieces = pack_lines("abcdefgh", 4);
        assert_eq!(texts(&pieces), vec!["abcd", "efgh"]);
        assert_eq!(rejoin(&pieces), "abcdefgh");
    }

    #[test]
    fn test_pack_lines_keeps_blank_separators() {
        let text = "📰 A:\nx\n\n📰 B:\ny";
        assert_eq!(rejoin(&pack_lines(text, 1000)), text);
    }

    #[test]
    fn test_pack_lines_blank_line_at_piece_boundary() {
        // "📰 A:\nxx" is exactly 7 characters, so the blank line opens the next piece
        let text = "📰 A:\nxx\n\n📰 B:\nyy";
        let pieces = pack_lines(text, 7);
        assert_eq!(pieces[0].text, "📰 A:\nxx");
        assert_eq!(rejoin(&pieces), text);
        assert!(pieces.iter().all(|p| p.text.chars().count() <= 7));
    }

    #[test]
    fn test_pack_lines_rejoins_at_every_limit() {
        let report = "📰 Kyiv Post:\nНовина дня\nhttps://www.kyivpost.com/post/1\n\n📰 UNIAN:\n\nhttps://www.unian.net/2\n";
        for limit in 0..=40 {
            let pieces = pack_lines(report, limit);
            assert_eq!(rejoin(&pieces), report, "limit {limit}");
            if limit > 0 {
                assert!(pieces.iter().all(|p| p.text.chars().count() <= limit), "limit {limit}");
            }
        }
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        assert_eq!(truncate_for_log("Київ", 2), "Ки…(+4 bytes)");
    }
}
