use super::domain::LoanApplication;

/// Range violations over submitted numeric fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("{field} {found} is outside the accepted range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
        found: u64,
    },
}

/// Numeric bounds matching the form inputs; re-checked server-side so an
/// out-of-band caller cannot push degenerate values into the classifiers.
#[derive(Debug, Clone, Copy)]
pub struct IntakeBounds {
    pub age: (u8, u8),
    pub annual_income: (u32, u32),
    pub years_employed: (u8, u8),
    pub loan_amount: (u32, u32),
}

impl Default for IntakeBounds {
    fn default() -> Self {
        Self {
            age: (18, 100),
            annual_income: (1_000, 10_000_000),
            years_employed: (0, 60),
            loan_amount: (500, 500_000),
        }
    }
}

/// Guard producing the first range violation found in a submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard {
    bounds: IntakeBounds,
}

impl IntakeGuard {
    pub fn with_bounds(bounds: IntakeBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &IntakeBounds {
        &self.bounds
    }

    pub fn check(&self, application: &LoanApplication) -> Result<(), IntakeViolation> {
        in_range("age", u64::from(application.age), self.bounds.age)?;
        in_range(
            "income",
            u64::from(application.income),
            self.bounds.annual_income,
        )?;
        in_range(
            "years employed",
            u64::from(application.years_employed),
            self.bounds.years_employed,
        )?;
        in_range(
            "loan amount",
            u64::from(application.loan_amount),
            self.bounds.loan_amount,
        )?;
        Ok(())
    }
}

fn in_range<T: Into<u64>>(
    field: &'static str,
    found: u64,
    (min, max): (T, T),
) -> Result<(), IntakeViolation> {
    let (min, max) = (min.into(), max.into());
    if found < min || found > max {
        return Err(IntakeViolation::OutOfRange {
            field,
            min,
            max,
            found,
        });
    }
    Ok(())
}
