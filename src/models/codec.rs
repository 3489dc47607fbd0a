//! Line-level helpers for the canonical CSV form of a record
//!
//! Fields containing a comma, a double quote or a line break are wrapped in
//! double quotes with inner quotes doubled. Parsing accepts exactly that form.

/// Column order of the canonical CSV line
pub const CSV_HEADER: &str = "title,artist,duration,album,genre,year,play_count,rating";

const CSV_SPECIAL: [char; 4] = [',', '"', '\n', '\r'];

/// Quote a field if it contains a separator, quote or line break
pub fn escape_csv_field(field: &str) -> String {
    if !field.contains(CSV_SPECIAL) {
        return field.to_string();
    }

    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push('"');
    for ch in field.chars() {
        if ch == '"' {
            escaped.push_str("\"\"");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('"');
    escaped
}

/// Split one CSV line into raw field values, honoring quoted fields
///
/// A quote only opens a quoted section at the start of a field; `""` inside
/// a quoted section is a literal quote.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' && current.is_empty() {
            in_quotes = true;
        } else if ch == ',' {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    fields
}

/// Format a rating so that parsing it back yields the same `f64`
///
/// Whole values keep one decimal place (`4.0`); anything else uses the
/// shortest representation that round-trips.
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}
