// SPDX-License-Identifier: MPL-2.0
//! Renders domain [`Filter`] expressions in PocketBase's filter syntax.

use crate::domain::gallery::{Filter, FilterValue};

/// Renders `filter` as a PocketBase filter string.
#[must_use]
pub fn render(filter: &Filter) -> String {
    match filter {
        Filter::Eq { field, value } => format!("{field} = {}", render_value(value)),
        Filter::Or(parts) => {
            let joined = parts.iter().map(render).collect::<Vec<_>>().join(" || ");
            format!("({joined})")
        }
    }
}

fn render_value(value: &FilterValue) -> String {
    match value {
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::Text(text) => quote(text),
    }
}

/// Double-quoted string literal with `\` and `"` escaped.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_filter() {
        assert_eq!(
            render(&Filter::eq_text("owner", "abc123")),
            r#"owner = "abc123""#
        );
    }

    #[test]
    fn bool_filter_is_unquoted() {
        assert_eq!(render(&Filter::eq_bool("public", true)), "public = true");
    }

    #[test]
    fn public_or_own_filter() {
        let filter = Filter::eq_bool("owner.public", true).or(Filter::eq_text("owner", "me"));
        assert_eq!(render(&filter), r#"(owner.public = true || owner = "me")"#);
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(
            render(&Filter::eq_text("owner", r#"x" || owner != ""#)),
            r#"owner = "x\" || owner != \"""#
        );
    }
}
