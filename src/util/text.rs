use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

const ELLIPSIS: &str = "...";

/// Truncates `s` so it occupies at most `max_width` terminal columns.
///
/// Text that already fits is returned borrowed. Otherwise the result ends in
/// `"..."`, except for widths of 3 or less where there is no room for both a
/// character and the ellipsis and the text is simply cut.
///
/// ```
/// use newsdesk::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Markets rally", 20), "Markets rally");
/// assert_eq!(truncate_to_width("Markets rally", 10), "Markets...");
/// assert_eq!(truncate_to_width("Markets", 2), "Ma");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = if max_width <= ELLIPSIS.len() {
        max_width
    } else {
        max_width - ELLIPSIS.len()
    };

    let mut width = 0;
    let mut cut = None;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if cut.is_none() && width + w > budget {
            cut = Some(idx);
        }
        width += w;
        if width > max_width {
            let end = cut.unwrap_or(idx);
            return if max_width <= ELLIPSIS.len() {
                Cow::Owned(s[..end].to_string())
            } else {
                Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
            };
        }
    }

    Cow::Borrowed(s)
}

/// Strips terminal control characters and ANSI escape sequences.
///
/// Article text comes straight from third-party news sources and is drawn
/// into the terminal, so anything that could move the cursor or retitle the
/// window is dropped. Tab, newline and carriage return survive.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_control = |c: char| c == '\x7f' || (c < ' ' && !matches!(c, '\t' | '\n' | '\r'));
    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            // CSI: parameters until a final byte in 0x40..=0x7e
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            // OSC: until BEL or ST (ESC \)
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

/// Collapses all runs of whitespace (including newlines) into single spaces.
pub fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
