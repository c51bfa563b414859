//! Quote-aware splitting of a single CSV line.

/// Field separator.
pub const DELIMITER: char = ',';

/// Quote character. Doubled inside a quoted field to stand for itself.
pub const QUOTE: char = '"';

/// Split one line into trimmed field values.
///
/// - `""` inside a quoted field yields a literal `"`
/// - any other `"` toggles quoting and is dropped
/// - `,` outside quotes ends a field
///
/// An unterminated quote is not an error: the rest of the line is consumed
/// into the last field. The result always holds at least one field.
///
/// # Example
/// ```ignore
/// use csvnest::tokenize;
///
/// assert_eq!(tokenize(r#""a,b","c""d""#), vec!["a,b", "c\"d"]);
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes && chars.peek() == Some(&QUOTE) => {
                current.push(QUOTE);
                chars.next();
            }
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}
