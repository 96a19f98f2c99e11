//! Registered compatibility cases.

mod go;
mod lightgbm;
mod sklearn;
mod xgboost;

pub use lightgbm::{LGBinaryBreastCancer, LGMulticlassIris};
pub use sklearn::SKGradientBoostingBreastCancer;
pub use xgboost::XGBinaryBreastCancer;

use crate::case::Case;

/// Every case the harness knows about, in run order.
pub fn registry() -> Vec<Box<dyn Case>> {
    vec![
        Box::new(LGBinaryBreastCancer),
        Box::new(LGMulticlassIris),
        Box::new(XGBinaryBreastCancer),
        Box::new(SKGradientBoostingBreastCancer),
    ]
}

/// Look up a case by name, ignoring ASCII case.
pub fn find(name: &str) -> Option<Box<dyn Case>> {
    registry()
        .into_iter()
        .find(|case| case.name().eq_ignore_ascii_case(name))
}
