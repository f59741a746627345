//! Word boundary helpers over a single block's text.
//!
//! Offsets are char offsets. Words are runs of alphanumerics and underscores.

use crate::content::ContentBlock;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Find word boundary backward from cursor.
pub fn find_word_boundary_backward(block: &ContentBlock, cursor: usize) -> usize {
    let chars: Vec<char> = block.text.chars().collect();
    let mut pos = cursor.min(chars.len());

    // Skip any whitespace/punctuation immediately before cursor.
    while pos > 0 && !is_word_char(chars[pos - 1]) {
        pos -= 1;
    }

    // Skip the word characters.
    while pos > 0 && is_word_char(chars[pos - 1]) {
        pos -= 1;
    }

    pos
}

/// Find word boundary forward from cursor.
pub fn find_word_boundary_forward(block: &ContentBlock, cursor: usize) -> usize {
    let chars: Vec<char> = block.text.chars().collect();
    let len = chars.len();
    let mut pos = cursor.min(len);

    // Skip whitespace/punctuation first, then the word.
    while pos < len && !is_word_char(chars[pos]) {
        pos += 1;
    }
    while pos < len && is_word_char(chars[pos]) {
        pos += 1;
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BlockType;

    fn block(text: &str) -> ContentBlock {
        ContentBlock::new("a".into(), BlockType::Unstyled, text)
    }

    #[test]
    fn test_word_boundary_backward() {
        let b = block("hello big world");
        assert_eq!(find_word_boundary_backward(&b, 15), 10);
        assert_eq!(find_word_boundary_backward(&b, 10), 6);
        assert_eq!(find_word_boundary_backward(&b, 8), 6);
        assert_eq!(find_word_boundary_backward(&b, 0), 0);
    }

    #[test]
    fn test_word_boundary_forward() {
        let b = block("hello big world");
        assert_eq!(find_word_boundary_forward(&b, 0), 5);
        assert_eq!(find_word_boundary_forward(&b, 5), 9);
        assert_eq!(find_word_boundary_forward(&b, 15), 15);
    }

    #[test]
    fn test_word_boundary_multibyte() {
        let b = block("привет мир");
        assert_eq!(find_word_boundary_backward(&b, 10), 7);
        assert_eq!(find_word_boundary_forward(&b, 0), 6);
    }
}
