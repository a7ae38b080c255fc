use platform_authz::can_assign_tasks;
use serde::Serialize;

use crate::{Employee, HrModule, HrResult, Repository, Session};

/// Gross above which the higher income tax band applies (whole units).
pub const HIGH_TAX_THRESHOLD: i64 = 100_000;

/// Monthly payslip split. All amounts are minor units (1/100 of a currency
/// unit) so every component is exact.
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryBreakdown {
    pub gross: i64,
    pub basic: i64,
    pub hra: i64,
    pub special_allowance: i64,
    pub pf: i64,
    pub tax: i64,
    pub net: i64,
}

impl SalaryBreakdown {
    /// Splits a gross monthly salary given in whole units.
    pub fn for_gross(gross_units: i64) -> Self {
        let gross = gross_units * 100;
        let basic = gross / 2;
        let hra = gross / 4;
        let special_allowance = gross * 15 / 100;
        let pf = basic * 12 / 100;
        let tax = if gross_units > HIGH_TAX_THRESHOLD {
            gross / 10
        } else {
            gross * 5 / 100
        };
        Self {
            gross,
            basic,
            hra,
            special_allowance,
            pf,
            tax,
            net: gross - pf - tax,
        }
    }
}

#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeamSalary {
    pub employee: Employee,
    pub breakdown: SalaryBreakdown,
}

impl<R: Repository> HrModule<R> {
    pub fn my_salary(&self, session: &Session) -> HrResult<SalaryBreakdown> {
        let me = self.require_employee(&session.employee_id)?;
        Ok(SalaryBreakdown::for_gross(me.salary))
    }

    /// Payslips of the visible team; empty for roles that cannot assign work.
    pub fn team_salaries(&self, session: &Session) -> Vec<TeamSalary> {
        if !can_assign_tasks(session.role) {
            return Vec::new();
        }
        self.team(session)
            .into_iter()
            .map(|emp| TeamSalary {
                employee: emp.clone(),
                breakdown: SalaryBreakdown::for_gross(emp.salary),
            })
            .collect()
    }

    /// Own payslip, or a visible employee's when the caller can assign work.
    pub fn salary_for(&self, session: &Session, employee_id: &str) -> HrResult<SalaryBreakdown> {
        let emp = self.personal_records_of(session, employee_id)?;
        Ok(SalaryBreakdown::for_gross(emp.salary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HrError;

    #[test]
    fn low_band_breakdown() {
        let b = SalaryBreakdown::for_gross(55_000);
        assert_eq!(b.gross, 5_500_000);
        assert_eq!(b.basic, 2_750_000);
        assert_eq!(b.hra, 1_375_000);
        assert_eq!(b.special_allowance, 825_000);
        assert_eq!(b.pf, 330_000);
        assert_eq!(b.tax, 275_000);
        assert_eq!(b.net, 4_895_000);
    }

    #[test]
    fn tax_band_switches_strictly_above_threshold() {
        assert_eq!(SalaryBreakdown::for_gross(100_000).tax, 500_000);
        assert_eq!(SalaryBreakdown::for_gross(100_001).tax, 1_000_010);
    }

    #[test]
    fn founder_net_salary() {
        let b = SalaryBreakdown::for_gross(500_000);
        assert_eq!(b.pf, 3_000_000);
        assert_eq!(b.tax, 5_000_000);
        assert_eq!(b.net, 42_000_000);
    }

    #[test]
    fn team_salaries_follow_assignment_rights() {
        let hr = HrModule::demo();
        let lead = hr.session("13").unwrap();
        assert!(hr.team_salaries(&lead).is_empty());
        assert_eq!(hr.my_salary(&lead).unwrap(), SalaryBreakdown::for_gross(90_000));

        let manager = hr.session("9").unwrap();
        let team = hr.team_salaries(&manager);
        assert_eq!(team.len(), 10);
        assert!(team.iter().all(|row| row.employee.id != "9"));
    }

    #[test]
    fn salary_lookup_is_scoped_to_visibility() {
        let hr = HrModule::demo();
        let manager = hr.session("9").unwrap();
        assert!(hr.salary_for(&manager, "20").is_ok());
        assert!(matches!(
            hr.salary_for(&manager, "1"),
            Err(HrError::NotFound { .. })
        ));
    }

    #[test]
    fn non_assigners_only_see_their_own_payslip() {
        let hr = HrModule::demo();
        let employee = hr.session("17").unwrap();
        assert_eq!(
            hr.salary_for(&employee, "17").unwrap(),
            SalaryBreakdown::for_gross(55_000)
        );
        assert!(matches!(
            hr.salary_for(&employee, "20"),
            Err(HrError::Forbidden(_))
        ));
        let lead = hr.session("13").unwrap();
        assert!(matches!(
            hr.salary_for(&lead, "20"),
            Err(HrError::Forbidden(_))
        ));
    }
}
