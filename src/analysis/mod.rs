pub mod error;
pub mod hemisphere;
pub mod regression;

pub use hemisphere::{regress_against_latitude, split_hemispheres, Hemisphere, HemisphereRegression};
pub use regression::{linear_regression, RegressionFit};
