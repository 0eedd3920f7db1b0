//! Identifier casing: property names to storage column names.

/// Map a property or parameter name to its snake_case storage name.
///
/// A separator is inserted before every uppercase letter that is not the
/// first character, then the whole string is lowercased. A leading
/// non-letter prefix (e.g. the `@` sigil on a bound parameter) is kept
/// verbatim and excluded from first-character accounting.
///
/// Consecutive uppercase runs split letter-by-letter; this is load-bearing
/// for compatibility with existing storage schemas:
///
/// ```
/// use sqlforge::casing::to_snake_case;
/// assert_eq!(to_snake_case("UserId"), "user_id");
/// assert_eq!(to_snake_case("XMLHttpRequest"), "x_m_l_http_request");
/// assert_eq!(to_snake_case("@SessionId"), "@session_id");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut seen_letter = false;
    for ch in name.chars() {
        if !ch.is_alphabetic() && !seen_letter {
            // Sigil or other prefix before the first letter.
            out.push(ch);
            continue;
        }
        if ch.is_uppercase() {
            if seen_letter {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
        seen_letter = true;
    }
    out
}
