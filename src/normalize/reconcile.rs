use super::{Record, Value};

/// Align a row with a target column list.
///
/// The result has exactly one value per target column: the row's value when present,
/// otherwise [`Value::ZERO`]. Row columns outside the target are dropped. Never fails.
pub fn reconcile<S: AsRef<str>>(row: &Record, target: &[S]) -> Vec<Value> {
    target
        .iter()
        .map(|column| row.get(column.as_ref()).cloned().unwrap_or(Value::ZERO))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_zero_fills_missing_columns() {
        let row: Record = vec![("Date", Value::from("01012024")), ("Level", Value::Integer(5))]
            .into_iter()
            .collect();

        let aligned = reconcile(&row, &["Date", "Squad", "Level"]);
        assert_eq!(
            aligned,
            vec![Value::from("01012024"), Value::Integer(0), Value::Integer(5)]
        );
    }

    #[test]
    fn test_drops_extra_columns() {
        let row: Record = vec![("a", Value::Integer(1)), ("b", Value::Integer(2)), ("c", Value::Integer(3))]
            .into_iter()
            .collect();

        assert_eq!(reconcile(&row, &["c", "a"]), vec![Value::Integer(3), Value::Integer(1)]);
        assert!(reconcile(&row, &[] as &[&str]).is_empty());
    }

    #[test]
    fn test_present_missing_marker_is_not_zero_filled() {
        let row: Record = vec![("Coins", Value::Missing)].into_iter().collect();
        assert_eq!(reconcile(&row, &["Coins"]), vec![Value::Missing]);
    }

    #[test]
    fn test_shape_properties_for_random_rows() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let universe: Vec<String> = (0..60).map(|i| format!("col_{}", i)).collect();

        for _ in 0..200 {
            let row_len = rng.gen_range(0..60);
            let row_columns: Vec<String> = universe.choose_multiple(&mut rng, row_len).cloned().collect();
            let row: Record = row_columns
                .into_iter()
                .map(|c| (c, Value::Integer(rng.gen_range(1..1000))))
                .collect();

            let target_len = rng.gen_range(0..60);
            let target: Vec<String> = universe.choose_multiple(&mut rng, target_len).cloned().collect();

            let aligned = reconcile(&row, &target);
            assert_eq!(aligned.len(), target.len());

            for (column, value) in target.iter().zip(&aligned) {
                match row.get(column) {
                    Some(expected) => assert_eq!(value, expected),
                    None => assert_eq!(value, &Value::ZERO),
                }
            }
        }
    }
}
