//! Reference libraries a compatibility case can target.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Package providing the shared ML utilities (datasets, splits) every case uses.
pub const AUXILIARY_PACKAGE: &str = "scikit-learn";

/// Library whose models a case checks against leaves.
///
/// Declaration order is the order report sections are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LibraryVariant {
    #[serde(rename = "XGBOOST")]
    XGBoost,
    #[serde(rename = "LIGHTGBM")]
    LightGBM,
    #[serde(rename = "SKLEARN")]
    Sklearn,
}

impl LibraryVariant {
    /// Every variant, in declaration order.
    pub const ALL: [LibraryVariant; 3] = [
        LibraryVariant::XGBoost,
        LibraryVariant::LightGBM,
        LibraryVariant::Sklearn,
    ];

    /// Upper-case name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            LibraryVariant::XGBoost => "XGBOOST",
            LibraryVariant::LightGBM => "LIGHTGBM",
            LibraryVariant::Sklearn => "SKLEARN",
        }
    }

    /// Lower-case name used for environment directories.
    pub fn lower_name(&self) -> &'static str {
        match self {
            LibraryVariant::XGBoost => "xgboost",
            LibraryVariant::LightGBM => "lightgbm",
            LibraryVariant::Sklearn => "sklearn",
        }
    }

    /// Parse a lower-case directory name back into a variant.
    pub fn from_lower_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.lower_name() == name)
    }

    /// PyPI package name of the library itself.
    pub fn package(&self) -> &'static str {
        match self {
            LibraryVariant::XGBoost => "xgboost",
            LibraryVariant::LightGBM => "lightgbm",
            LibraryVariant::Sklearn => AUXILIARY_PACKAGE,
        }
    }

    /// Packages to install, in order, for `version` of this library.
    ///
    /// The auxiliary package goes in first so the pinned library wins any
    /// shared dependency resolution.
    pub fn install_plan(&self, version: &str) -> Vec<String> {
        let pinned = format!("{}=={}", self.package(), version);
        match self {
            LibraryVariant::XGBoost | LibraryVariant::LightGBM => {
                vec![AUXILIARY_PACKAGE.to_string(), pinned]
            }
            LibraryVariant::Sklearn => vec![pinned],
        }
    }
}

impl fmt::Display for LibraryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
