// Builds the variable catalog from a decoded KEY group

use crate::core::constants::FIXED_ENTRIES;
use crate::core::error::FormatError;
use crate::core::format::{BaseVariable, KeyGroup, ProblemCatalog, VariableDescriptor};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Expands every base variable into one catalog entry per item, after the
/// four fixed leading entries.
pub fn build_catalog(title: Option<String>, key: &KeyGroup) -> Result<ProblemCatalog, FormatError> {
    let spans = item_spans(key)?;

    let title = title.unwrap_or_else(|| {
        warn!("Plot file has no TITL record");
        String::new()
    });

    let mut entries: Vec<VariableDescriptor> = FIXED_ENTRIES
        .iter()
        .map(|(name, unit)| (name.to_string(), unit.to_string()))
        .enumerate()
        .map(|(catalog_index, (display_name, unit))| VariableDescriptor {
            display_name,
            unit,
            catalog_index,
        })
        .collect();
    entries.reserve(key.items.len());

    let mut base_variables = Vec::with_capacity(spans.len());
    let mut cursor = 0;
    for (g, &span) in spans.iter().enumerate() {
        let base = key.names[g].trim();
        let unit = key.units[g].trim();

        for &item in &key.items[cursor..cursor + span] {
            let display_name = match item {
                0 => base.to_string(),
                n => format!("{}_{}", base, n),
            };
            let catalog_index = entries.len();
            entries.push(VariableDescriptor {
                display_name,
                unit: unit.to_string(),
                catalog_index,
            });
        }
        cursor += span;

        base_variables.push(BaseVariable {
            name: base.to_string(),
            item_count: span,
            unit: unit.to_string(),
        });
    }

    let mut lookup = HashMap::with_capacity(entries.len());
    for entry in &entries {
        if lookup.contains_key(&entry.display_name) {
            warn!(
                "Duplicate variable name {}; keeping catalog index {}",
                entry.display_name, lookup[&entry.display_name]
            );
            continue;
        }
        lookup.insert(entry.display_name.clone(), entry.catalog_index);
    }

    debug!(
        "Catalog built: {} base variables, {} entries",
        base_variables.len(),
        entries.len()
    );

    Ok(ProblemCatalog::new(title, base_variables, entries, lookup))
}

/// Number of items owned by each group, from the cumulative position table.
fn item_spans(key: &KeyGroup) -> Result<Vec<usize>, FormatError> {
    let group_count = key.group_count as usize;
    let total = key.total_item_count as usize;

    for (what, len) in [
        ("base variable names", key.names.len()),
        ("position table entries", key.positions.len()),
        ("units", key.units.len()),
    ] {
        if len != group_count {
            return Err(FormatError::ItemCountMismatch {
                what,
                expected: group_count as u64,
                found: len as u64,
            });
        }
    }
    if key.items.len() != total {
        return Err(FormatError::ItemCountMismatch {
            what: "item numbers",
            expected: total as u64,
            found: key.items.len() as u64,
        });
    }

    // positions are 1-based; the sentinel closes the last group
    let mut bounds: Vec<u64> = key.positions.iter().map(|&p| u64::from(p)).collect();
    bounds.push(total as u64 + 1);

    let mut spans = Vec::with_capacity(group_count);
    for pair in bounds.windows(2) {
        let span = pair[1].checked_sub(pair[0]).ok_or(FormatError::ItemCountMismatch {
            what: "position table order",
            expected: pair[0],
            found: pair[1],
        })?;
        spans.push(span as usize);
    }

    let sum: usize = spans.iter().sum();
    if sum != total || spans.len() != group_count {
        return Err(FormatError::ItemCountMismatch {
            what: "items per variable",
            expected: total as u64,
            found: sum as u64,
        });
    }
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(names: &[&str], positions: &[u32], units: &[&str], items: &[u32]) -> KeyGroup {
        KeyGroup {
            group_count: names.len() as u32,
            total_item_count: items.len() as u32,
            names: names.iter().map(|s| s.to_string()).collect(),
            positions: positions.to_vec(),
            units: units.iter().map(|s| s.to_string()).collect(),
            items: items.to_vec(),
        }
    }

    fn names(catalog: &ProblemCatalog) -> Vec<&str> {
        catalog.names().collect()
    }

    #[test]
    fn test_single_indexed_group() {
        let catalog = build_catalog(Some("T".into()), &key(&["FOO"], &[1], &["K"], &[1, 2, 3])).unwrap();
        assert_eq!(
            names(&catalog),
            vec!["TIME", "CPU", "DT", "UNKN03", "FOO_1", "FOO_2", "FOO_3"]
        );
        assert_eq!(catalog.get("FOO_2").unwrap().catalog_index, 5);
        assert_eq!(catalog.get("FOO_2").unwrap().unit, "K");
        assert_eq!(catalog.get("TIME").unwrap().unit, "sec");
        assert_eq!(catalog.base_variables()[0].item_count, 3);
    }

    #[test]
    fn test_scalar_and_indexed_groups() {
        let catalog = build_catalog(
            None,
            &key(
                &["CVH-P  ", " COR-TSVC"],
                &[1, 3],
                &["PA   ", "K"],
                &[2, 7, 0],
            ),
        )
        .unwrap();
        assert_eq!(catalog.title(), "");
        assert_eq!(&names(&catalog)[4..], &["CVH-P_2", "CVH-P_7", "COR-TSVC"]);
        assert_eq!(catalog.get("CVH-P_7").unwrap().unit, "PA");
        assert_eq!(catalog.get("COR-TSVC").unwrap().unit, "K");

        let spans: Vec<usize> = catalog.base_variables().iter().map(|b| b.item_count).collect();
        assert_eq!(spans, vec![2, 1]);
    }

    #[test]
    fn test_catalog_indices_are_positions() {
        let catalog = build_catalog(None, &key(&["A", "B"], &[1, 2], &["", ""], &[0, 1, 2])).unwrap();
        for (i, entry) in catalog.entries().iter().enumerate() {
            assert_eq!(entry.catalog_index, i);
        }
        assert_eq!(catalog.len(), 4 + 3);
    }

    #[test]
    fn test_lookup_trims_whitespace() {
        let catalog = build_catalog(None, &key(&["FOO"], &[1], &["K"], &[1])).unwrap();
        assert_eq!(catalog.get("  FOO_1 ").unwrap().catalog_index, 4);
        assert!(catalog.get("FOO").is_none());
    }

    #[test]
    fn test_span_sum_mismatch_is_fatal() {
        // position table claims the only group starts at item 2
        let err = build_catalog(None, &key(&["FOO"], &[2], &["K"], &[1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            FormatError::ItemCountMismatch {
                what: "items per variable",
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_decreasing_positions_rejected() {
        let err = build_catalog(None, &key(&["A", "B"], &[3, 1], &["", ""], &[1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            FormatError::ItemCountMismatch { what: "position table order", .. }
        ));
    }

    #[test]
    fn test_group_table_length_mismatch() {
        let mut bad = key(&["A", "B"], &[1, 2], &["", ""], &[1, 2]);
        bad.units.pop();
        let err = build_catalog(None, &bad).unwrap_err();
        assert_eq!(
            err,
            FormatError::ItemCountMismatch {
                what: "units",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let catalog = build_catalog(None, &key(&["A", "A"], &[1, 2], &["x", "y"], &[1, 1])).unwrap();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("A_1").unwrap().catalog_index, 4);
    }

    #[test]
    fn test_empty_key_group() {
        let catalog = build_catalog(None, &KeyGroup::default()).unwrap();
        assert_eq!(names(&catalog), vec!["TIME", "CPU", "DT", "UNKN03"]);
    }
}
