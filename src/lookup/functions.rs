//! Fixed correction table for business-function names
//!
//! The register accumulated a decade of hand-typed function names. This
//! table maps the known typos and variants to their canonical form;
//! anything unlisted passes through trimmed but otherwise unchanged.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::models::DoaItem;

/// Lower-cased variant -> canonical display name.
static CORRECTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("finance", "Finance"),
        ("finanace", "Finance"),
        ("finace", "Finance"),
        ("hr", "Human Resources"),
        ("human resources", "Human Resources"),
        ("human ressources", "Human Resources"),
        ("it", "Information Technology"),
        ("information technology", "Information Technology"),
        ("info tech", "Information Technology"),
        ("procurement", "Procurement"),
        ("procurment", "Procurement"),
        ("purchasing", "Procurement"),
        ("legal", "Legal & Compliance"),
        ("legal & compliance", "Legal & Compliance"),
        ("legal and compliance", "Legal & Compliance"),
        ("compliance", "Legal & Compliance"),
        ("treasury", "Treasury"),
        ("treasurey", "Treasury"),
        ("operations", "Operations"),
        ("ops", "Operations"),
        ("sales & marketing", "Sales & Marketing"),
        ("sales and marketing", "Sales & Marketing"),
        ("marketing", "Sales & Marketing"),
    ])
});

/// Correct a function name against the fixed table. Unlisted names pass
/// through trimmed; comparison callers must normalize both sides.
pub fn normalize_function_name(name: &str) -> String {
    let trimmed = name.trim();
    match CORRECTIONS.get(trimmed.to_lowercase().as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => trimmed.to_string(),
    }
}

/// Sorted, deduplicated set of normalized function names across a load
/// of items. Seeds the function-filter dropdown.
pub fn known_functions(items: &[DoaItem]) -> Vec<String> {
    let set: BTreeSet<String> = items
        .iter()
        .filter_map(|item| item.function_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .map(normalize_function_name)
        .collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_typos_are_corrected() {
        assert_eq!(normalize_function_name("Finanace"), "Finance");
        assert_eq!(normalize_function_name("procurment"), "Procurement");
        assert_eq!(normalize_function_name("  HR  "), "Human Resources");
    }

    #[test]
    fn test_unlisted_names_pass_through() {
        assert_eq!(normalize_function_name("Facilities"), "Facilities");
        assert_eq!(normalize_function_name(" Facilities "), "Facilities");
    }

    #[test]
    fn test_known_functions_dedup_and_sort() {
        let mk = |id: i64, function: &str| DoaItem {
            id,
            code: id.to_string(),
            function_name: Some(function.to_string()),
            sort_order: id,
            ..Default::default()
        };
        let items = vec![
            mk(1, "finanace"),
            mk(2, "Finance"),
            mk(3, "HR"),
            mk(4, "   "),
        ];

        let functions = known_functions(&items);
        assert_eq!(functions, vec!["Finance", "Human Resources"]);
    }
}
