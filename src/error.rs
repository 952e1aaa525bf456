use thiserror::Error;

/// Rejected interactive input.
///
/// The `Display` text is exactly what the user sees before being asked again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a valid number.")]
    NotANumber(String),

    #[error("Amount must be greater than zero.")]
    AmountNotPositive,

    #[error("{item} must be between {low} and {high}.")]
    OutOfRange { item: String, low: i64, high: i64 },

    #[error("{0} is not in a valid date format.")]
    InvalidDate(String),

    #[error("Year of the date must be between {low} and {high}.")]
    YearOutOfRange { low: i32, high: i32 },

    #[error("Region must be one of the following: {0}.")]
    InvalidRegion(String),
}
