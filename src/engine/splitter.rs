/// Split a document into lines.
///
/// Lines end at `\n`; a `\r` right before it is dropped. A final terminator
/// does not open a new line, and the empty document has no lines at all.
pub fn split(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    let body = text.strip_suffix('\n').unwrap_or(text);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
