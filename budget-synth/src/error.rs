use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("CSV Error")]
    CsvError(#[from] csv::Error),
    #[error("Spreadsheet Error")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),
    #[error("I/O Error")]
    IoError(#[from] io::Error),
    #[error("The {0} category table is empty")]
    EmptyTable(&'static str),
    #[error("Invalid amount range [{min}, {max}]: min must be positive and not above max")]
    InvalidRange { min: u32, max: u32 },
    #[error("Amounts must be positive")]
    InvalidAmount,
    #[error("No such category: {0}")]
    UnknownCategory(String),
    #[error("{0} is not a valid year")]
    InvalidYear(i32),
    #[error("Probability {0} must lie within [0, 1]")]
    InvalidProbability(f64),
    #[error("The description list is empty")]
    NoDescriptions,
    #[error("Rounding step must be positive")]
    InvalidRoundingStep,
}
