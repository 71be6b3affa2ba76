//! SQL identifier quoting.
//!
//! Column names in generated `SET` lists are always emitted as quoted
//! identifiers: the name is wrapped in `"` and any embedded `"` is doubled.
//! Names come from developer-controlled column maps, so nothing beyond quoting
//! is checked here.

/// Append `name` to `out` as a quoted identifier.
pub(crate) fn write_quoted(out: &mut String, name: &str) {
    out.reserve(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Render `name` as a quoted identifier.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::new();
    write_quoted(&mut out, name);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_simple_name() {
        assert_eq!(quote_ident("first_name"), r#""first_name""#);
    }

    #[test]
    fn preserves_case() {
        assert_eq!(quote_ident("firstName"), r#""firstName""#);
    }

    #[test]
    fn doubles_embedded_quotes() {
        assert_eq!(quote_ident(r#"has"quote"#), r#""has""quote""#);
    }

    #[test]
    fn injection_stays_inside_identifier() {
        assert_eq!(
            quote_ident(r#"age"=0; DROP TABLE users; --"#),
            r#""age""=0; DROP TABLE users; --""#
        );
    }
}
