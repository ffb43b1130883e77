use crate::domain::applicant::ApplicantInput;
use crate::features::columns;
use crate::features::schema::{FeatureRow, FeatureSchema};

/// The model's age column counts days before the application, so it is negative.
const DAYS_PER_YEAR: f64 = 365.0;

/// Builds a full model-shaped row from form input.
///
/// Every schema column starts at zero; mapped inputs and the derived `CREDIT_TERM` are
/// written over it. Mapped columns the schema does not know are skipped, so the row never
/// gains or loses columns relative to `schema`.
pub fn assemble(schema: &FeatureSchema, input: &ApplicantInput) -> FeatureRow {
    let mut row = schema.zeroed_row();

    let mapped = [
        (columns::AMT_INCOME_TOTAL, input.income),
        (columns::AMT_CREDIT, input.credit_amount),
        (columns::AMT_ANNUITY, input.annuity),
        (columns::DAYS_BIRTH, days_birth(input.age_years)),
        (columns::EXT_SOURCE_2, input.ext_source_2),
        (columns::EXT_SOURCE_3, input.ext_source_3),
        (columns::BUREAU_LOAN_COUNT, f64::from(input.bureau_loan_count)),
        (
            columns::CREDIT_TERM,
            credit_term(input.credit_amount, input.annuity),
        ),
    ];

    for (column, value) in mapped {
        if !row.set(column, value) {
            tracing::trace!(column, "column not in model schema; skipped");
        }
    }

    row
}

pub fn days_birth(age_years: u32) -> f64 {
    -f64::from(age_years) * DAYS_PER_YEAR
}

/// Loan amount over monthly annuity. The `+ 1` matches the training-time feature.
pub fn credit_term(credit_amount: f64, annuity: f64) -> f64 {
    credit_amount / (annuity + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::applicant::Gender;

    fn input() -> ApplicantInput {
        ApplicantInput {
            gender: Gender::Male,
            age_years: 30,
            income: 50_000.0,
            credit_amount: 250_000.0,
            annuity: 15_000.0,
            bureau_loan_count: 2,
            ext_source_2: 0.3,
            ext_source_3: 0.6,
        }
    }

    fn full_schema() -> FeatureSchema {
        FeatureSchema::new([
            "SK_ID_CURR",
            columns::AMT_INCOME_TOTAL,
            columns::AMT_CREDIT,
            columns::AMT_ANNUITY,
            columns::DAYS_BIRTH,
            "FLAG_OWN_CAR",
            columns::EXT_SOURCE_2,
            columns::EXT_SOURCE_3,
            columns::BUREAU_LOAN_COUNT,
            columns::CREDIT_TERM,
        ])
        .unwrap()
    }

    #[test]
    fn maps_known_columns_and_zero_fills_the_rest() {
        let row = assemble(&full_schema(), &input());
        assert_eq!(row.len(), 10);
        assert_eq!(row.get("SK_ID_CURR"), Some(0.0));
        assert_eq!(row.get("FLAG_OWN_CAR"), Some(0.0));
        assert_eq!(row.get(columns::AMT_INCOME_TOTAL), Some(50_000.0));
        assert_eq!(row.get(columns::AMT_CREDIT), Some(250_000.0));
        assert_eq!(row.get(columns::AMT_ANNUITY), Some(15_000.0));
        assert_eq!(row.get(columns::EXT_SOURCE_2), Some(0.3));
        assert_eq!(row.get(columns::EXT_SOURCE_3), Some(0.6));
        assert_eq!(row.get(columns::BUREAU_LOAN_COUNT), Some(2.0));
    }

    #[test]
    fn age_becomes_negative_day_count() {
        let row = assemble(&full_schema(), &input());
        assert_eq!(row.get(columns::DAYS_BIRTH), Some(-10_950.0));
    }

    #[test]
    fn credit_term_keeps_plus_one_guard() {
        let row = assemble(&full_schema(), &input());
        let term = row.get(columns::CREDIT_TERM).unwrap();
        assert_eq!(term, 250_000.0 / 15_001.0);
        assert!((term - 16.665556).abs() < 1e-6);
        assert_eq!(credit_term(1_000.0, 0.0), 1_000.0);
    }

    #[test]
    fn columns_missing_from_schema_are_not_injected() {
        let schema = FeatureSchema::new(["OTHER", columns::AMT_CREDIT]).unwrap();
        let row = assemble(&schema, &input());
        let names: Vec<_> = row.iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["OTHER".to_string(), columns::AMT_CREDIT.to_string()]);
        assert_eq!(row.get(columns::AMT_CREDIT), Some(250_000.0));
        assert_eq!(row.get(columns::AMT_INCOME_TOTAL), None);
    }

    #[test]
    fn schema_without_any_mapped_column_stays_all_zero() {
        let schema = FeatureSchema::new(["X", "Y"]).unwrap();
        let row = assemble(&schema, &input());
        assert_eq!(row.values(), &[0.0, 0.0]);
    }

    #[test]
    fn is_deterministic() {
        let schema = full_schema();
        assert_eq!(assemble(&schema, &input()), assemble(&schema, &input()));
    }
}
