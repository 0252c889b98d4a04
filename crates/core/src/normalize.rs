//! Line normalization: turn raw header lines into logical lines the field
//! matcher can test one at a time.

/// Normalize raw declaration-file lines.
///
/// Blank lines are dropped. A line whose text ends with `>` is assumed to
/// continue on the next line (a member type broken before its name), so lines
/// are joined with a single space until the joined text no longer ends with
/// `>`. Finally each logical line is cut at its first `//`.
pub fn normalize_lines<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut joined = Vec::new();
    let mut buffer = String::new();

    for line in raw.iter().map(|l| l.as_ref().trim()).filter(|l| !l.is_empty()) {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(line);
        if !buffer.trim_end().ends_with('>') {
            joined.push(std::mem::take(&mut buffer));
        }
    }
    if !buffer.is_empty() {
        joined.push(buffer);
    }

    joined.into_iter().map(|line| strip_line_comment(&line)).collect()
}

fn strip_line_comment(line: &str) -> String {
    match line.find("//") {
        Some(pos) => line[..pos].trim_end().to_string(),
        None => line.to_string(),
    }
}
