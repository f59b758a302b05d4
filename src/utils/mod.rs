//! Utility functions.

/// Telegram's message length limit, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Split text into chunks that fit into a single Telegram message.
///
/// Splits on line breaks where possible; a single line longer than the
/// limit is cut at character boundaries. Always returns at least one chunk.
pub fn split_message(text: &str) -> Vec<String> {
    split_with_limit(text, MAX_MESSAGE_LEN)
}

fn split_with_limit(text: &str, limit: usize) -> Vec<String> {
    if utf16_len(text) <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    // `current` holds at least one (possibly empty) line
    let mut started = false;

    for line in text.split('\n') {
        let line_len = utf16_len(line);
        let sep = usize::from(started);

        if current_len + sep + line_len <= limit {
            if started {
                current.push('\n');
            }
            current.push_str(line);
            current_len += sep + line_len;
            started = true;
            continue;
        }

        if started {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        started = true;

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
            continue;
        }

        // Oversized line: cut by characters
        for c in line.chars() {
            let c_len = c.len_utf16();
            if current_len + c_len > limit && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += c_len;
        }
    }

    if started {
        chunks.push(current);
    }

    chunks
}
