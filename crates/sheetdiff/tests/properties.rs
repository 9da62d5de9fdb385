//! Alignment and diff invariants over generated sheets

use proptest::prelude::*;
use sheetdiff::{align, diff, DiffConfig, DiffMask};
use sheetdiff::{CellValue, SheetSnapshot, StyleRecord};

fn cell_value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        (-1000i32..1000).prop_map(|n| CellValue::Number(f64::from(n) / 4.0)),
        "[a-cA-C ]{0,4}".prop_map(CellValue::Text),
        any::<bool>().prop_map(CellValue::Boolean),
    ]
}

fn sheet() -> impl Strategy<Value = SheetSnapshot> {
    (0usize..6, 0usize..6)
        .prop_flat_map(|(rows, cols)| {
            (
                prop::collection::vec(prop::collection::vec(cell_value(), cols), rows),
                prop::collection::vec((0u32..6, 0u16..6, any::<bool>()), 0..4),
                prop::collection::vec((0u32..6, 0u16..6, "[A-C][1-3]"), 0..3),
            )
        })
        .prop_map(|(rows, styled, formulas)| {
            let mut sheet = SheetSnapshot::from_rows("S", rows);
            for (r, c, bold) in styled {
                sheet.styles.set(r, c, StyleRecord::new().bold(bold));
            }
            for (r, c, target) in formulas {
                if r < sheet.row_count() && c < sheet.col_count() {
                    sheet.formulas.insert(r, c, format!("={}", target));
                }
            }
            sheet
        })
}

fn config() -> impl Strategy<Value = DiffConfig> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(case, ws, numfmt)| {
        DiffConfig::new()
            .ignore_case(case)
            .ignore_whitespace(ws)
            .ignore_number_format(numfmt)
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, ..ProptestConfig::default() })]

    #[test]
    fn aligned_shapes_are_equal(a in sheet(), b in sheet()) {
        let (a2, b2) = align(&a, &b);
        let rows = a.row_count().max(b.row_count());
        let cols = a.col_count().max(b.col_count());
        prop_assert_eq!((a2.row_count(), a2.col_count()), (rows, cols));
        prop_assert_eq!((b2.row_count(), b2.col_count()), (rows, cols));
    }

    #[test]
    fn padding_is_empty_and_unstyled(a in sheet(), b in sheet()) {
        let (a2, _) = align(&a, &b);
        for r in 0..a2.row_count() {
            for c in 0..a2.col_count() {
                if r >= a.row_count() || c >= a.col_count() {
                    prop_assert_eq!(a2.value(r, c), &CellValue::Empty);
                    prop_assert!(a2.style(r, c).is_default());
                    prop_assert_eq!(a2.formula(r, c), None);
                } else {
                    prop_assert_eq!(a2.value(r, c), a.value(r, c));
                    prop_assert_eq!(a2.style(r, c), a.style(r, c));
                }
            }
        }
    }

    #[test]
    fn diff_is_symmetric(a in sheet(), b in sheet(), cfg in config()) {
        let forward = diff(&a, &b, &cfg);
        let backward = diff(&b, &a, &cfg);
        prop_assert_eq!(forward.diff_map(), backward.diff_map());
        prop_assert_eq!(forward.rows_with_content_diff(), backward.rows_with_content_diff());
    }

    #[test]
    fn diff_is_idempotent(a in sheet(), b in sheet(), cfg in config()) {
        let (a2, b2) = align(&a, &b);
        prop_assert_eq!(diff(&a2, &b2, &cfg), diff(&a2, &b2, &cfg));
        let raw = diff(&a, &b, &cfg);
        let aligned = diff(&a2, &b2, &cfg);
        prop_assert_eq!(raw.diff_map(), aligned.diff_map());
        prop_assert_eq!(raw.rows_with_content_diff(), aligned.rows_with_content_diff());
    }

    #[test]
    fn row_sets_match_the_map(a in sheet(), b in sheet(), cfg in config()) {
        let result = diff(&a, &b, &cfg);
        for ((row, _), mask) in result.diff_map().iter() {
            prop_assert!(!mask.is_empty());
            if mask.contains(DiffMask::CONTENT) {
                prop_assert!(result.rows_with_content_diff().contains(&row));
            }
            if mask.format() {
                prop_assert!(result.rows_with_format_diff().contains(&row));
            }
            if mask.formula() {
                prop_assert!(result.rows_with_formula_diff().contains(&row));
            }
        }
    }

    #[test]
    fn sheet_equals_itself(a in sheet(), cfg in config()) {
        prop_assert!(diff(&a, &a, &cfg).is_identical());
    }
}
