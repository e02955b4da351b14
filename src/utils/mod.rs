/// Check that a table, column or database name only uses `[A-Za-z0-9_]`.
///
/// Names pass straight into statement text, so anything else is refused.
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check the `yyyy-MM-dd` shape of a date value.
///
/// Only the shape is checked; the server rejects impossible dates.
pub fn is_sql_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Check the shape of a decimal literal: `[+-]digits[.digits][e[+-]digits]`.
///
/// A leading or trailing point is allowed (`.5`, `5.`). The magnitude is not
/// limited, so literals past the `f64` range such as `1e400` pass.
pub fn is_numeric_literal(value: &str) -> bool {
    fn skip_digits(bytes: &[u8]) -> usize {
        bytes.iter().take_while(|b| b.is_ascii_digit()).count()
    }

    let bytes = value.as_bytes();
    let mut pos = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = skip_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = skip_digits(&bytes[pos..]);
        pos += frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = skip_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

/// Quote an identifier for use in statement text, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("users"));
        assert!(is_valid_identifier("Order_Items2"));
        assert!(is_valid_identifier("_"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("users;"));
        assert!(!is_valid_identifier("drop table"));
        assert!(!is_valid_identifier("name-with-dash"));
        assert!(!is_valid_identifier("naïve"));
    }

    #[test]
    fn test_sql_date_shape() {
        assert!(is_sql_date("2024-02-29"));
        assert!(is_sql_date("0000-00-00"));
        assert!(!is_sql_date("2024-2-29"));
        assert!(!is_sql_date("2024/02/29"));
        assert!(!is_sql_date("20240229xx"));
        assert!(!is_sql_date(""));
        assert!(!is_sql_date("2024-02-29 "));
    }

    #[test]
    fn test_numeric_literal_shape() {
        for ok in ["0", "-7", "+3", "19.990", ".5", "5.", "1e400", "-2.5E-3", "1e+10"] {
            assert!(is_numeric_literal(ok), "{} should pass", ok);
        }
        for bad in ["", "-", ".", "1,5", "1e", "e5", "1.2.3", "NaN", "inf", "0x1F", " 1"] {
            assert!(!is_numeric_literal(bad), "{} should fail", bad);
        }
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("name"), "\"name\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
