pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if max_len == 1 {
        return "…".to_string();
    }

    if s.char_indices().nth(max_len).is_none() {
        return s.to_string();
    }

    let take = max_len - 1;
    let cut = s.char_indices().nth(take).map(|(idx, _)| idx).unwrap_or(0);

    let mut out = String::with_capacity(cut + '…'.len_utf8());
    out.push_str(&s[..cut]);
    out.push('…');
    out
}

/// Cuts a window of at most `width` characters out of `text` that keeps
/// character `position` visible, and returns it with a caret line pointing
/// at that character. Elided ends are marked with `…`.
///
/// A position at or past the end points just after the last character.
pub fn caret_window(text: &str, position: usize, width: usize) -> (String, String) {
    let chars: Vec<char> = text.chars().collect();
    let width = width.max(3);
    let position = position.min(chars.len());

    if chars.len() <= width {
        return (text.to_string(), format!("{}^", " ".repeat(position)));
    }

    let mut start = position.saturating_sub(width / 2);
    let mut end = start + width;
    if end > chars.len() {
        end = chars.len();
        start = end - width;
    }

    let mut window: Vec<char> = chars[start..end].to_vec();
    if start > 0 {
        window[0] = '…';
    }
    if end < chars.len() {
        window[width - 1] = '…';
    }

    (
        window.into_iter().collect(),
        format!("{}^", " ".repeat(position - start)),
    )
}
