//! Keep organizations with a city and average their reported income

use serde_json::Value;

use crate::extract::Record;

/// Output of [`transform`]
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// Records whose `city` is set, in input order
    pub kept: Vec<Record>,
    /// Mean `income_amount` over kept records that report a number; 0 if none do
    pub mean_income: f64,
}

/// Loose truthiness: null, false, 0, "" and empty containers are unset.
fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

pub fn transform(records: Vec<Record>) -> Transformed {
    log::info!("Transforming {} records (keeping those with a city)...", records.len());

    let mut incomes = Vec::new();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|org| {
            let city = org.get("city");
            let income = org.get("income_amount");
            log::debug!(
                "city: {}, income_amount: {}",
                city.unwrap_or(&Value::Null),
                income.unwrap_or(&Value::Null)
            );
            if !is_set(city) {
                return false;
            }
            // 0 counts; only non-numbers are skipped
            if let Some(amount) = income.and_then(Value::as_f64) {
                incomes.push(amount);
            }
            true
        })
        .collect();

    let mean_income = if incomes.is_empty() {
        0.0
    } else {
        incomes.iter().sum::<f64>() / incomes.len() as f64
    };

    log::info!("Kept {} organizations", kept.len());
    log::info!("Mean income (where reported): {mean_income:.2} $");

    Transformed { kept, mean_income }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keeps_only_records_with_city() {
        let records = vec![
            json!({ "name": "a", "city": "LYON" }),
            json!({ "name": "b", "city": null }),
            json!({ "name": "c", "city": "" }),
            json!({ "name": "d" }),
            json!({ "name": "e", "city": "NANTES" }),
        ];
        let out = transform(records);
        let names: Vec<&str> = out.kept.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["a", "e"]);
    }

    #[test]
    fn mean_counts_zero_but_skips_missing_and_non_numeric() {
        let records = vec![
            json!({ "city": "A", "income_amount": 100 }),
            json!({ "city": "B", "income_amount": 0 }),
            json!({ "city": "C", "income_amount": 50.5 }),
            json!({ "city": "D", "income_amount": null }),
            json!({ "city": "E", "income_amount": "n/a" }),
            json!({ "city": "F" }),
        ];
        let out = transform(records);
        assert_eq!(out.kept.len(), 6);
        assert!((out.mean_income - 150.5 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn income_of_dropped_records_is_ignored() {
        let records = vec![
            json!({ "city": "A", "income_amount": 10 }),
            json!({ "city": null, "income_amount": 1_000_000 }),
        ];
        let out = transform(records);
        assert_eq!(out.mean_income, 10.0);
    }

    #[test]
    fn empty_input_has_zero_mean() {
        let out = transform(Vec::new());
        assert!(out.kept.is_empty());
        assert_eq!(out.mean_income, 0.0);
    }

    #[test]
    fn truthiness_of_odd_city_values() {
        assert!(!is_set(Some(&json!(false))));
        assert!(!is_set(Some(&json!(0))));
        assert!(!is_set(Some(&json!([]))));
        assert!(is_set(Some(&json!(true))));
        assert!(is_set(Some(&json!(3))));
        assert!(is_set(Some(&json!({ "name": "X" }))));
    }
}
