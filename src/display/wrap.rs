/// Wraps text to fit within the given width, breaking at word boundaries.
///
/// Whitespace runs collapse to single spaces. A word longer than the width is
/// split into width-sized chunks rather than truncated, so nothing is lost.
///
/// # Arguments
/// * `text` - Text to wrap
/// * `max_width` - Maximum width per line, in characters
///
/// # Returns
/// * `Vec<String>` - Wrapped lines, none longer than `max_width`
///
/// # Example
/// ```
/// use retrofeed::display::wrap_text;
///
/// let lines = wrap_text("The quick brown fox jumps over the lazy dog", 15);
/// assert_eq!(lines, vec!["The quick brown", "fox jumps over", "the lazy dog"]);
/// ```
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_width {
            lines.push(std::mem::take(&mut current_line));
            current_len = 0;
        }

        if word_len > max_width {
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_width).peekable();
            while let Some(chunk) = chunks.next() {
                if chunks.peek().is_some() {
                    if current_len > 0 {
                        lines.push(std::mem::take(&mut current_line));
                        current_len = 0;
                    }
                    lines.push(chunk.iter().collect());
                } else {
                    current_line = chunk.iter().collect();
                    current_len = chunk.len();
                }
            }
            continue;
        }

        if current_len > 0 {
            current_line.push(' ');
            current_len += 1;
        }
        current_line.push_str(word);
        current_len += word_len;
    }

    if current_len > 0 {
        lines.push(current_line);
    }

    lines
}
