//! Salary assignment model.
//!
//! An assignment binds one employee to a specific structure version and a
//! CTC over a range of dates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The binding of a structure version, a CTC and effective dates to one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryAssignment {
    /// The employee receiving the assignment.
    pub employee_id: String,
    /// The structure id.
    pub structure_id: String,
    /// The pinned structure version.
    pub structure_version: u32,
    /// Annual cost-to-company.
    pub ctc_annual: Decimal,
    /// First day the assignment applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last day the assignment applies (inclusive); open-ended if absent.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl SalaryAssignment {
    /// Returns true if the assignment applies on the given date.
    ///
    /// # Example
    ///
    /// ```
    /// use salary_engine::models::SalaryAssignment;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let assignment = SalaryAssignment {
    ///     employee_id: "emp_001".to_string(),
    ///     structure_id: "standard".to_string(),
    ///     structure_version: 1,
    ///     ctc_annual: Decimal::from(1_200_000),
    ///     effective_from: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
    ///     effective_to: None,
    /// };
    /// assert!(assignment.is_active_on(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
    /// assert!(!assignment.is_active_on(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
    /// ```
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|end| date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_assignment(effective_to: Option<NaiveDate>) -> SalaryAssignment {
        SalaryAssignment {
            employee_id: "emp_001".to_string(),
            structure_id: "standard".to_string(),
            structure_version: 2,
            ctc_annual: Decimal::from(900_000),
            effective_from: date(2026, 1, 1),
            effective_to,
        }
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let assignment = create_assignment(Some(date(2026, 6, 30)));
        assert!(assignment.is_active_on(date(2026, 6, 30)));
        assert!(!assignment.is_active_on(date(2026, 7, 1)));
    }

    #[test]
    fn test_open_ended_assignment_stays_active() {
        let assignment = create_assignment(None);
        assert!(assignment.is_active_on(date(2040, 1, 1)));
    }

    #[test]
    fn test_deserialize_without_end_date() {
        let json = r#"{
            "employee_id": "emp_009",
            "structure_id": "standard",
            "structure_version": 1,
            "ctc_annual": "600000",
            "effective_from": "2026-04-01"
        }"#;
        let assignment: SalaryAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.effective_to, None);
        assert_eq!(assignment.ctc_annual, Decimal::from(600_000));
    }
}
