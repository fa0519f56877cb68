//! Single-cell container encoding.
//!
//! A container of layer `d` (container levels at and below it) separates
//! its entries with `d - 1` closing braces followed by `|`. Entries that are
//! themselves containers are wrapped in one `{…}` pair, so the braces that
//! close an entry are exactly the ones the separator looks for:
//!
//! ```text
//! list<int>            1|2|3
//! list<list<int>>      {1|2}|{3}
//! dict<list<int>>      a={1|2}|b={3}
//! ```

use smallvec::SmallVec;

pub type Entries<'a> = SmallVec<[&'a str; 8]>;

/// Entry separator for a container of the given layer.
pub fn separator(layer: usize) -> String {
    let mut sep = "}".repeat(layer.saturating_sub(1));
    sep.push('|');
    sep
}

/// Split a cell into the raw entries of a container of `layer`.
///
/// Closing braces matched by the separator stay with the entry before it.
pub fn split_entries(layer: usize, text: &str) -> Entries<'_> {
    let sep = separator(layer);
    let keep = sep.len() - 1;
    let mut out = Entries::new();
    let mut rest = text;
    while let Some(pos) = rest.find(&sep) {
        out.push(&rest[..pos + keep]);
        rest = &rest[pos + sep.len()..];
    }
    out.push(rest);
    out
}

/// Remove one `{…}` wrapper, if present.
pub fn unwrap_entry(text: &str) -> &str {
    text.strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(text)
}

/// Wrap a nested container's encoding for use as an entry.
pub fn wrap_entry(text: &str) -> String {
    format!("{{{text}}}")
}

/// Split a dict entry into its key and payload on the first `=`.
pub fn split_key(text: &str) -> Option<(&str, &str)> {
    text.split_once('=').map(|(k, v)| (k.trim(), v.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_by_layer() {
        assert_eq!(separator(1), "|");
        assert_eq!(separator(2), "}|");
        assert_eq!(separator(3), "}}|");
    }

    #[test]
    fn flat_split() {
        assert_eq!(split_entries(1, "a=1|b=2").as_slice(), &["a=1", "b=2"]);
        assert_eq!(split_entries(1, "").as_slice(), &[""]);
    }

    #[test]
    fn nested_split_keeps_closing_braces() {
        let entries = split_entries(2, "{1|2}|{3}");
        assert_eq!(entries.as_slice(), &["{1|2}", "{3}"]);
        assert_eq!(unwrap_entry(entries[0]), "1|2");

        let entries = split_entries(3, "{{1|2}|{3}}|{{4}}");
        assert_eq!(entries.as_slice(), &["{{1|2}|{3}}", "{{4}}"]);
        assert_eq!(
            split_entries(2, unwrap_entry(entries[0])).as_slice(),
            &["{1|2}", "{3}"]
        );
    }

    #[test]
    fn unwrap_only_strips_one_pair() {
        assert_eq!(unwrap_entry("{{4}}"), "{4}");
        assert_eq!(unwrap_entry("4"), "4");
        assert_eq!(unwrap_entry("{4"), "{4");
    }

    #[test]
    fn keys_split_on_first_equals() {
        assert_eq!(split_key("a = x=y"), Some(("a", "x=y")));
        assert_eq!(split_key("plain"), None);
    }
}
