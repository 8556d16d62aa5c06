//! Household input records and batch loading

mod data;
pub mod loader;

pub use data::{
    AgeGroup, BudgetLevel, Household, Person, Preferences, PrimaryPlanContext, Residence,
};
pub use loader::{load_households, load_households_from_reader};
