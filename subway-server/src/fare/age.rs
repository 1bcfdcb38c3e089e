//! Age-based fare discounts.

/// Youngest accepted age.
const MIN_AGE: i32 = 0;

/// First age that is no longer accepted.
const MAX_AGE: i32 = 150;

/// Error returned for ages outside `[0, 150)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("age must be at least {} and below {}, got {age}", MIN_AGE, MAX_AGE)]
pub struct InvalidAge {
    age: i32,
}

impl InvalidAge {
    pub fn age(&self) -> i32 {
        self.age
    }
}

/// Rider category an age falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Infant,
    Child,
    Adolescent,
    Adult,
    Senior,
}

/// One row of the discount table: ages `[min_age, max_age)` pay
/// `(fare - amount) * (100 - percent) / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeDiscountPolicy {
    group: AgeGroup,
    min_age: i32,
    max_age: i32,
    amount: u32,
    percent: u32,
}

/// Brackets in ascending age order; together they cover `[MIN_AGE, MAX_AGE)`.
const POLICIES: [AgeDiscountPolicy; 5] = [
    AgeDiscountPolicy {
        group: AgeGroup::Infant,
        min_age: MIN_AGE,
        max_age: 6,
        amount: 0,
        percent: 100,
    },
    AgeDiscountPolicy {
        group: AgeGroup::Child,
        min_age: 6,
        max_age: 13,
        amount: 350,
        percent: 20,
    },
    AgeDiscountPolicy {
        group: AgeGroup::Adolescent,
        min_age: 13,
        max_age: 19,
        amount: 350,
        percent: 20,
    },
    AgeDiscountPolicy {
        group: AgeGroup::Adult,
        min_age: 19,
        max_age: 65,
        amount: 0,
        percent: 0,
    },
    AgeDiscountPolicy {
        group: AgeGroup::Senior,
        min_age: 65,
        max_age: MAX_AGE,
        amount: 0,
        percent: 100,
    },
];

impl AgeDiscountPolicy {
    /// Looks up the bracket for `age`.
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::fare::{AgeDiscountPolicy, AgeGroup};
    ///
    /// let policy = AgeDiscountPolicy::for_age(15).unwrap();
    /// assert_eq!(policy.group(), AgeGroup::Adolescent);
    /// assert_eq!(policy.apply(1950), 1280);
    ///
    /// assert!(AgeDiscountPolicy::for_age(150).is_err());
    /// ```
    pub fn for_age(age: i32) -> Result<Self, InvalidAge> {
        POLICIES
            .iter()
            .find(|p| p.covers(age))
            .copied()
            .ok_or(InvalidAge { age })
    }

    pub fn group(&self) -> AgeGroup {
        self.group
    }

    fn covers(&self, age: i32) -> bool {
        age >= self.min_age && age < self.max_age
    }

    /// Applies the discount, truncating toward zero. Never goes below zero.
    pub fn apply(&self, fare: u32) -> u32 {
        let base = u64::from(fare.saturating_sub(self.amount));
        let discounted = base * u64::from(100 - self.percent) / 100;
        u32::try_from(discounted).unwrap_or(u32::MAX)
    }
}
