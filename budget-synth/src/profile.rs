use chrono::NaiveDate;
use rand::Rng;

use crate::error::GenError;
use crate::record::Amount;

/// Inclusive amount bounds for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    pub(crate) min: u32,
    pub(crate) max: u32,
}

impl AmountRange {
    /// # Errors
    /// Errors unless `0 < min <= max`.
    pub fn new(min: u32, max: u32) -> Result<Self, GenError> {
        if min > 0 && min <= max {
            Ok(AmountRange { min, max })
        } else {
            Err(GenError::InvalidRange { min, max })
        }
    }

    #[must_use]
    pub fn min(self) -> u32 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> u32 {
        self.max
    }

    #[must_use]
    pub fn contains(self, amount: Amount) -> bool {
        self.min <= amount.get() && amount.get() <= self.max
    }

    pub fn sample<R: Rng>(self, rng: &mut R) -> Amount {
        Amount(rng.gen_range(self.min..=self.max))
    }

    /// Rounds `amount` to the nearest multiple of `step`, clamped back into
    /// the range so the category invariant survives rounding.
    #[must_use]
    pub fn round_within(self, amount: Amount, step: u32) -> Amount {
        Amount(amount.round_to(step).clamp(self.min, self.max))
    }
}

/// An ordered set of categories with their amount bounds. Order matters only
/// for reproducibility of seeded draws.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<(String, AmountRange)>,
}

impl CategoryTable {
    #[must_use]
    pub fn new(entries: Vec<(String, AmountRange)>) -> Self {
        CategoryTable { entries }
    }

    /// Source-constant tables bypass `AmountRange::new`; `Profile::validate`
    /// still checks every range before generation starts.
    fn builtin(entries: &[(&str, u32, u32)]) -> Self {
        CategoryTable {
            entries: entries
                .iter()
                .map(|&(name, min, max)| (name.to_string(), AmountRange { min, max }))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn range(&self, category: &str) -> Option<AmountRange> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|&(_, range)| range)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn entries(&self) -> &[(String, AmountRange)] {
        &self.entries
    }

    /// # Panics
    /// Panics on an empty table; `Profile::validate` rejects those up front.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> (&str, AmountRange) {
        let (name, range) = &self.entries[rng.gen_range(0..self.entries.len())];
        (name.as_str(), *range)
    }
}

/// How many rows to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counts {
    /// One total; each row's kind is drawn with `Profile::income_probability`.
    Total(usize),
    /// Exact per-kind counts, no kind draw.
    Split { expense: usize, income: usize },
}

impl Counts {
    #[must_use]
    pub fn total(self) -> usize {
        match self {
            Counts::Total(n) => n,
            Counts::Split { expense, income } => expense + income,
        }
    }
}

/// On the listed days of the month, with the given probability, a row becomes
/// a salary income regardless of the usual kind split.
#[derive(Debug, Clone, PartialEq)]
pub struct PaydayRule {
    pub days: Vec<u32>,
    pub probability: f64,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rounding {
    pub probability: f64,
    pub step: u32,
}

/// Everything the generator needs, as explicit configuration. The two
/// built-in profiles reproduce the two original throwaway scripts.
#[derive(Debug, Clone)]
pub struct Profile {
    pub year: i32,
    pub counts: Counts,
    pub expenses: CategoryTable,
    pub incomes: CategoryTable,
    /// Chance that a non-payday row is an income, in `Counts::Total` mode.
    pub income_probability: f64,
    pub descriptions: Vec<String>,
    pub expense_description: String,
    pub payday: Option<PaydayRule>,
    pub rounding: Option<Rounding>,
    /// Distinguishes output files: `budget_<year>_<tag>.<ext>`.
    pub tag: String,
}

const DESCRIPTIONS: [&str; 6] = [
    "Оплата",
    "Покупка",
    "Перевод",
    "Платеж",
    "Взнос",
    "Транзакция",
];

impl Profile {
    /// The first script: 1000 mixed rows with payday bias and occasional
    /// rounding to the nearest 10.
    #[must_use]
    pub fn data() -> Self {
        Profile {
            year: 2025,
            counts: Counts::Total(1000),
            expenses: CategoryTable::builtin(&[
                ("Продукты", 500, 7000),
                ("Комуналка", 3000, 10000),
                ("Интернет", 500, 1000),
                ("Моб. связь", 300, 1500),
                ("Кредиты", 10000, 30000),
                ("Химия", 200, 2000),
                ("Одежда", 1500, 15000),
                ("Обувь", 2000, 10000),
                ("Ремонт", 1000, 20000),
                ("Мебель", 5000, 50000),
                ("Кафе", 500, 5000),
                ("Кино", 300, 1500),
                ("Спорт", 2000, 5000),
                ("Хобби", 500, 10000),
                ("Путешествия", 15000, 100_000),
                ("Бензин", 1000, 3000),
                ("ТО", 5000, 20000),
                ("Страховка", 5000, 15000),
                ("Такси", 200, 1500),
                ("Общ. транспорт", 50, 2000),
                ("Подарки", 1000, 10000),
                ("Медицина", 500, 15000),
                ("Обучение", 1000, 50000),
                ("Благотворительность", 100, 5000),
                ("Другое", 100, 5000),
            ]),
            incomes: CategoryTable::builtin(&[
                ("Зарплата", 60000, 150_000),
                ("Премия", 10000, 50000),
                ("Подработка", 1000, 15000),
                ("Дивиденды", 500, 5000),
                ("Проценты", 100, 2000),
                ("Аренда", 15000, 30000),
                ("Подарок", 1000, 10000),
                ("Возврат долга", 500, 5000),
                ("Продажа вещей", 500, 20000),
            ]),
            income_probability: 0.15,
            descriptions: DESCRIPTIONS.iter().map(ToString::to_string).collect(),
            expense_description: "-".to_string(),
            payday: Some(PaydayRule {
                days: vec![5, 20],
                probability: 0.7,
                category: "Зарплата".to_string(),
            }),
            rounding: Some(Rounding {
                probability: 0.8,
                step: 10,
            }),
            tag: "data".to_string(),
        }
    }

    /// The second script: exact 900/100 expense/income split over the
    /// consumer application's own taxonomy, every amount rounded to 100.
    #[must_use]
    pub fn strict() -> Self {
        Profile {
            year: 2025,
            counts: Counts::Split {
                expense: 900,
                income: 100,
            },
            expenses: CategoryTable::builtin(&[
                ("Продукты", 500, 7000),
                ("Автомобиль", 1000, 20000),
                ("Хозтовары", 200, 2000),
                ("Подарки", 1000, 10000),
                ("Здоровье", 500, 15000),
                ("Кафе/Развлечения", 300, 5000),
                ("Коммуналка", 3000, 10000),
                ("Одежда", 1500, 15000),
                ("Транспорт", 100, 2000),
                ("Прочее", 100, 5000),
            ]),
            incomes: CategoryTable::builtin(&[
                ("Зарплата", 60000, 150_000),
                ("Подработка", 1000, 15000),
                ("Кэшбэк", 100, 3000),
            ]),
            income_probability: 0.15,
            descriptions: DESCRIPTIONS.iter().map(ToString::to_string).collect(),
            expense_description: "-".to_string(),
            payday: None,
            rounding: Some(Rounding {
                probability: 1.0,
                step: 100,
            }),
            tag: "strict".to_string(),
        }
    }

    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("budget_{}_{}.{}", self.year, self.tag, extension)
    }

    /// # Errors
    /// Errors on an empty category table or description list, a range with
    /// `min == 0` or `min > max`, a probability outside `[0, 1]`, a zero
    /// rounding step, a payday category missing from the income table, or a
    /// year `chrono` cannot represent.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.expenses.is_empty() {
            return Err(GenError::EmptyTable("expense"));
        }
        if self.incomes.is_empty() {
            return Err(GenError::EmptyTable("income"));
        }
        for (_, range) in self.expenses.entries().iter().chain(self.incomes.entries()) {
            if range.min == 0 || range.min > range.max {
                return Err(GenError::InvalidRange {
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if self.descriptions.is_empty() {
            return Err(GenError::NoDescriptions);
        }
        check_probability(self.income_probability)?;
        if let Some(payday) = &self.payday {
            check_probability(payday.probability)?;
            if self.incomes.range(&payday.category).is_none() {
                return Err(GenError::UnknownCategory(payday.category.clone()));
            }
        }
        if let Some(rounding) = self.rounding {
            check_probability(rounding.probability)?;
            if rounding.step == 0 {
                return Err(GenError::InvalidRoundingStep);
            }
        }
        if NaiveDate::from_ymd_opt(self.year, 1, 1).is_none() {
            return Err(GenError::InvalidYear(self.year));
        }
        Ok(())
    }
}

fn check_probability(probability: f64) -> Result<(), GenError> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(GenError::InvalidProbability(probability))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_amount_range_new() {
        assert!(AmountRange::new(500, 7000).is_ok());
        assert!(AmountRange::new(500, 500).is_ok());
        assert!(AmountRange::new(0, 7000).is_err());
        assert!(AmountRange::new(7000, 500).is_err());
    }

    #[test]
    fn test_amount_range_sample_within_bounds() {
        let range = AmountRange::new(500, 7000).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
    }

    #[test]
    fn test_round_within_clamps() {
        let range = AmountRange::new(500, 7000).unwrap();
        let amount = Amount::try_from(1234).unwrap();
        assert_eq!(range.round_within(amount, 10).get(), 1230);

        // rounding that would escape the range gets clamped back
        let narrow = AmountRange::new(15, 20).unwrap();
        let amount = Amount::try_from(16).unwrap();
        assert_eq!(narrow.round_within(amount, 100).get(), 15);
        let amount = Amount::try_from(20).unwrap();
        assert_eq!(narrow.round_within(amount, 1000).get(), 20);
    }

    #[test]
    fn test_round_within_near_max_range() {
        let range = AmountRange::new(u32::MAX - 9, u32::MAX).unwrap();
        let amount = Amount::try_from(u32::MAX).unwrap();
        assert_eq!(range.round_within(amount, 10).get(), u32::MAX);
        let amount = Amount::try_from(u32::MAX - 9).unwrap();
        assert!(range.contains(range.round_within(amount, 100)));
    }

    #[test]
    fn test_groceries_range() {
        let profile = Profile::data();
        let range = profile.expenses.range("Продукты").unwrap();
        assert_eq!(range.min(), 500);
        assert_eq!(range.max(), 7000);
    }

    #[test]
    fn test_builtin_profiles_validate() {
        assert!(Profile::data().validate().is_ok());
        assert!(Profile::strict().validate().is_ok());
    }

    #[test]
    fn test_builtin_table_sizes() {
        let data = Profile::data();
        assert_eq!(data.expenses.len(), 25);
        assert_eq!(data.incomes.len(), 9);
        let strict = Profile::strict();
        assert_eq!(strict.expenses.len(), 10);
        assert_eq!(strict.incomes.len(), 3);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(Profile::data().file_name("xlsx"), "budget_2025_data.xlsx");
        assert_eq!(Profile::strict().file_name("xlsx"), "budget_2025_strict.xlsx");
        assert_eq!(Profile::data().file_name("csv"), "budget_2025_data.csv");
    }

    #[test]
    fn test_validate_rejects_empty_tables() {
        let mut profile = Profile::data();
        profile.expenses = CategoryTable::new(vec![]);
        assert!(matches!(
            profile.validate(),
            Err(GenError::EmptyTable("expense"))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_range() {
        let mut profile = Profile::data();
        profile.incomes = CategoryTable::builtin(&[("Зарплата", 100, 50)]);
        assert!(matches!(
            profile.validate(),
            Err(GenError::InvalidRange { min: 100, max: 50 })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut profile = Profile::data();
        profile.income_probability = 1.5;
        assert!(matches!(
            profile.validate(),
            Err(GenError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_payday_category() {
        let mut profile = Profile::data();
        if let Some(payday) = &mut profile.payday {
            payday.category = "Стипендия".to_string();
        }
        assert!(matches!(
            profile.validate(),
            Err(GenError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_step() {
        let mut profile = Profile::strict();
        profile.rounding = Some(Rounding {
            probability: 0.5,
            step: 0,
        });
        assert!(matches!(
            profile.validate(),
            Err(GenError::InvalidRoundingStep)
        ));
    }

    #[test]
    fn test_counts_total() {
        assert_eq!(Counts::Total(1000).total(), 1000);
        assert_eq!(
            Counts::Split {
                expense: 900,
                income: 100
            }
            .total(),
            1000
        );
    }
}
