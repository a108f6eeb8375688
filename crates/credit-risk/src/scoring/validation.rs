/// Youngest age at which employment history can plausibly start (part-time
/// work included), so an applicant can have at most `age - 15` years of
/// employment.
pub const MINIMUM_WORKING_AGE: u8 = 15;

/// Plausibility failures over the raw form fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "implausible employment history: an applicant aged {age} cannot have \
         {years_employed} years of employment"
    )]
    ImplausibleEmployment { age: u8, years_employed: u8 },
}

/// Pure check of the employment-duration rule. No side effects, no I/O.
pub fn check_employment(age: u8, years_employed: u8) -> Result<(), ValidationError> {
    if i16::from(years_employed) > i16::from(age) - i16::from(MINIMUM_WORKING_AGE) {
        return Err(ValidationError::ImplausibleEmployment {
            age,
            years_employed,
        });
    }
    Ok(())
}
