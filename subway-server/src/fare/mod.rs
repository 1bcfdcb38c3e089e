//! Fare calculation.
//!
//! A ride costs the basic fare, plus a surcharge by distance, plus the
//! highest surcharge among the lines used, minus the rider's age discount.

mod age;
mod pipeline;

pub use age::{AgeDiscountPolicy, AgeGroup, InvalidAge};
pub use pipeline::{BASIC_FARE, FarePipeline, FareStage, calculate_fare, distance_surcharge};
