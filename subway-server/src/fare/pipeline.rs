//! Fixed-order fare calculation.
//!
//! The fare is built up by folding a running amount through four stages:
//! base fare, distance surcharge, line surcharge, age discount. The order
//! never changes, so the stages are plain values in an array.

use super::age::{AgeDiscountPolicy, InvalidAge};

/// Flat fare every ride starts from.
pub const BASIC_FARE: u32 = 1250;

/// Distance covered by the basic fare.
const FREE_DISTANCE: u32 = 10;

/// End of the short-surcharge tier.
const MID_TIER_END: u32 = 50;

/// Tier step lengths; each started step costs one `SURCHARGE_UNIT`.
const MID_TIER_STEP: u32 = 5;
const LONG_TIER_STEP: u32 = 8;

const SURCHARGE_UNIT: u32 = 100;

/// Surcharge for a route of `distance`.
///
/// # Examples
///
/// ```
/// use subway_server::fare::distance_surcharge;
///
/// assert_eq!(distance_surcharge(10), 0);
/// assert_eq!(distance_surcharge(11), 100);
/// assert_eq!(distance_surcharge(50), 800);
/// assert_eq!(distance_surcharge(59), 1000);
/// ```
pub fn distance_surcharge(distance: u32) -> u32 {
    if distance <= FREE_DISTANCE {
        return 0;
    }
    let mid = distance.min(MID_TIER_END) - FREE_DISTANCE;
    let long = distance.saturating_sub(MID_TIER_END);
    SURCHARGE_UNIT * (mid.div_ceil(MID_TIER_STEP) + long.div_ceil(LONG_TIER_STEP))
}

/// One step of the fare calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareStage {
    /// Replaces the running amount with [`BASIC_FARE`]
    Basic,
    /// Adds the distance surcharge
    DistanceOver { distance: u32 },
    /// Adds the highest extra fare among the lines ridden
    LineExtra { max_extra_fare: u32 },
    /// Applies the rider's age discount
    AgeDiscount(AgeDiscountPolicy),
}

impl FareStage {
    pub fn apply(&self, fare: u32) -> u32 {
        match self {
            FareStage::Basic => BASIC_FARE,
            FareStage::DistanceOver { distance } => {
                fare.saturating_add(distance_surcharge(*distance))
            }
            FareStage::LineExtra { max_extra_fare } => fare.saturating_add(*max_extra_fare),
            FareStage::AgeDiscount(policy) => policy.apply(fare),
        }
    }
}

/// The four fare stages for one ride, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarePipeline {
    stages: [FareStage; 4],
}

impl FarePipeline {
    /// Builds the pipeline for a route.
    ///
    /// `extra_fares` holds the surcharge of every line the route uses; only
    /// the highest one is charged.
    pub fn new(distance: u32, extra_fares: &[u32], age: i32) -> Result<Self, InvalidAge> {
        let policy = AgeDiscountPolicy::for_age(age)?;
        let max_extra_fare = extra_fares.iter().copied().max().unwrap_or(0);

        Ok(Self {
            stages: [
                FareStage::Basic,
                FareStage::DistanceOver { distance },
                FareStage::LineExtra { max_extra_fare },
                FareStage::AgeDiscount(policy),
            ],
        })
    }

    /// Runs every stage in order.
    pub fn calculate(&self) -> u32 {
        self.stages.iter().fold(0, |fare, stage| stage.apply(fare))
    }
}

/// Computes the fare for a ride in one call.
///
/// # Examples
///
/// ```
/// use subway_server::fare::calculate_fare;
///
/// // Adult, 18 units of distance, one line with a 500 surcharge
/// assert_eq!(calculate_fare(18, &[500], 30).unwrap(), 1250 + 200 + 500);
/// ```
pub fn calculate_fare(distance: u32, extra_fares: &[u32], age: i32) -> Result<u32, InvalidAge> {
    Ok(FarePipeline::new(distance, extra_fares, age)?.calculate())
}
