use std::convert::TryFrom;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::GenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Expense,
    Income,
}

impl Kind {
    /// The spreadsheet cell value the consumer application matches against.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Kind::Expense => "Расход",
            Kind::Income => "Доход",
        }
    }
}

/// A strictly positive whole amount of money in minor-unit-free currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(pub(crate) u32);

impl TryFrom<u32> for Amount {
    type Error = GenError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value > 0 {
            Ok(Amount(value))
        } else {
            Err(GenError::InvalidAmount)
        }
    }
}

impl Amount {
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Rounds to the nearest multiple of `step`; ties round half-up
    /// (`1245` becomes `1250` at step `10`). The result may be zero
    /// (e.g. `4` rounded to step `10`) or saturate at `u32::MAX`, so
    /// callers clamp it back into a category range before building a
    /// `Record`.
    #[must_use]
    pub(crate) fn round_to(self, step: u32) -> u32 {
        let step = u64::from(step);
        let rounded = (u64::from(self.0) + step / 2) / step * step;
        u32::try_from(rounded).unwrap_or(u32::MAX)
    }
}

/// One synthetic transaction row. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub kind: Kind,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Amount,
    pub description: String,
    pub id: Uuid,
}

impl Record {
    #[must_use]
    pub fn new(
        kind: Kind,
        date: NaiveDate,
        category: String,
        amount: Amount,
        description: String,
        id: Uuid,
    ) -> Self {
        Record {
            kind,
            date,
            category,
            amount,
            description,
            id,
        }
    }
}
