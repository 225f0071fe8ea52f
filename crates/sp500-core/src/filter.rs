use crate::schema::table::CompanyTable;
use std::collections::BTreeSet;
use tracing::trace;

/// Rows whose sector is in `sectors`, in their original order.
///
/// An empty selection yields an empty table over the same columns.
pub fn filter_by_sectors(table: &CompanyTable, sectors: &BTreeSet<String>) -> CompanyTable {
    let rows = table
        .rows()
        .iter()
        .filter(|row| sectors.contains(row.sector()))
        .cloned()
        .collect();
    let filtered = table.derive(rows);
    trace!(
        "{} of {} rows kept for sectors {sectors:?}",
        filtered.len(),
        table.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::table::tests::sample_table;
    use proptest::prelude::*;

    fn set(sectors: &[&str]) -> BTreeSet<String> {
        sectors.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_only_selected_sectors_in_order() {
        let table = sample_table();
        let it = filter_by_sectors(&table, &set(&["Information Technology"]));
        assert_eq!(it.symbols().collect::<Vec<_>>(), ["AAPL", "ADBE", "AMD"]);
        assert_eq!(it.columns(), table.columns());
    }

    #[test]
    fn all_sectors_returns_the_input() {
        let table = sample_table();
        assert_eq!(filter_by_sectors(&table, &table.sectors()), table);
    }

    #[test]
    fn empty_selection_is_empty_table() {
        let table = sample_table();
        let none = filter_by_sectors(&table, &BTreeSet::new());
        assert!(none.is_empty());
        assert_eq!(none.shape(), (0, 4));
    }

    #[test]
    fn unknown_sector_matches_nothing() {
        let none = filter_by_sectors(&sample_table(), &set(&["Real Estate"]));
        assert!(none.is_empty());
    }

    proptest! {
        #[test]
        fn output_is_an_ordered_subset(mask in proptest::collection::vec(any::<bool>(), 4)) {
            let table = sample_table();
            let selected: BTreeSet<String> = table
                .sectors()
                .into_iter()
                .zip(mask)
                .filter_map(|(sector, keep)| keep.then_some(sector))
                .collect();

            let filtered = filter_by_sectors(&table, &selected);

            prop_assert!(filtered.rows().iter().all(|row| selected.contains(row.sector())));

            let expected: Vec<&str> = table
                .rows()
                .iter()
                .filter(|row| selected.contains(row.sector()))
                .map(|row| row.symbol())
                .collect();
            prop_assert_eq!(filtered.symbols().collect::<Vec<_>>(), expected);
        }
    }
}
