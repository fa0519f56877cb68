/// Names derived from a workbook file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    /// File name without its extension (`item_table`).
    pub stem: String,
    /// UpperCamel type name (`ItemTable`).
    pub type_name: String,
}

impl FileName {
    /// Split `item_table.xlsx` into `item_table` / `ItemTable`.
    ///
    /// Only the last extension is removed; a name without one is used as-is.
    pub fn parse(file_name: &str) -> Self {
        let base = file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(file_name);
        let stem = match base.rfind('.') {
            Some(dot) if dot > 0 => &base[..dot],
            _ => base,
        };
        FileName {
            stem: stem.to_string(),
            type_name: upper_camel(stem),
        }
    }
}

/// `item_table` → `ItemTable`. Underscores are dropped and the character
/// after each one is upper-cased.
pub fn upper_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_stem_and_type_name() {
        let name = FileName::parse("item_table.xlsx");
        assert_eq!(name.stem, "item_table");
        assert_eq!(name.type_name, "ItemTable");
    }

    #[test]
    fn strips_directories_and_last_extension_only() {
        let name = FileName::parse("data/hero.skill_list.csv");
        assert_eq!(name.stem, "hero.skill_list");
        assert_eq!(name.type_name, "Hero.skillList");
    }
}
