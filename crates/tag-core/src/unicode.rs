//! Character-offset helpers.
//!
//! Offsets throughout the model count Unicode scalar values (`char`s), not
//! bytes. These helpers translate between the two.

/// Number of chars in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the char at `offset`. `offset == char_len(s)` maps to `s.len()`.
/// Returns `None` past the end.
pub fn byte_offset(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    let mut count = 0;
    for (idx, _) in s.char_indices() {
        if count == offset {
            return Some(idx);
        }
        count += 1;
    }
    (count == offset).then_some(s.len())
}

/// Slice `s` by char offsets `[start, end)`.
pub fn char_slice(s: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let from = byte_offset(s, start)?;
    let to = byte_offset(s, end)?;
    Some(&s[from..to])
}

/// Chars that terminate an in-progress token when scanning backward.
pub fn is_token_break(c: char) -> bool {
    c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_offset_ascii() {
        assert_eq!(byte_offset("abc", 0), Some(0));
        assert_eq!(byte_offset("abc", 2), Some(2));
        assert_eq!(byte_offset("abc", 3), Some(3));
        assert_eq!(byte_offset("abc", 4), None);
    }

    #[test]
    fn test_byte_offset_multibyte() {
        // "é" is 2 bytes, "漢" is 3 bytes
        let s = "é漢x";
        assert_eq!(char_len(s), 3);
        assert_eq!(byte_offset(s, 1), Some(2));
        assert_eq!(byte_offset(s, 2), Some(5));
        assert_eq!(byte_offset(s, 3), Some(6));
        assert_eq!(byte_offset("", 0), Some(0));
        assert_eq!(byte_offset("", 1), None);
    }

    #[test]
    fn test_char_slice() {
        assert_eq!(char_slice("hello #tag", 7, 10), Some("tag"));
        assert_eq!(char_slice("#タグ", 1, 3), Some("タグ"));
        assert_eq!(char_slice("abc", 2, 1), None);
        assert_eq!(char_slice("abc", 1, 9), None);
        assert_eq!(char_slice("abc", 3, 3), Some(""));
    }

    #[test]
    fn test_token_break() {
        assert!(is_token_break(' '));
        assert!(is_token_break('\t'));
        assert!(is_token_break('\u{3000}')); // ideographic space
        assert!(!is_token_break('#'));
        assert!(!is_token_break('_'));
    }
}
