use crate::is_blank;

/// Append lines from `lines` to `target` until a blank line or the end of
/// `lines` is reached. Returns the number of lines consumed, which includes the
/// terminating blank line if there was one. An immediately blank section is
/// valid: nothing is appended and 1 is returned.
pub fn read_section<S: AsRef<str>>(lines: &[S], target: &mut Vec<String>) -> usize {
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if is_blank(line) {
            return i + 1;
        }
        target.push(line.to_owned());
    }
    lines.len()
}
