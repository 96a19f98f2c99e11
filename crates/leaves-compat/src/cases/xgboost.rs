//! XGBoost binary-model cases.

use super::go::{go_program, predict_dense_body};
use crate::case::Case;
use crate::compare::Tolerance;
use crate::error::CaseError;
use crate::workspace::Workspace;
use leaves_venv::LibraryVariant;

const XGBOOST_VERSIONS: &[&str] = &["0.72.1", "0.80", "0.81", "0.82", "0.90"];

/// `binary:logistic` booster on the breast cancer dataset.
pub struct XGBinaryBreastCancer;

impl Case for XGBinaryBreastCancer {
    fn name(&self) -> &'static str {
        "XGBinaryBreastCancer"
    }

    fn library(&self) -> LibraryVariant {
        LibraryVariant::XGBoost
    }

    fn versions(&self) -> &'static [&'static str] {
        XGBOOST_VERSIONS
    }

    fn python_code(&self) -> String {
        r#"import numpy as np
import xgboost as xgb
from sklearn import datasets
from sklearn.model_selection import train_test_split

X, y = datasets.load_breast_cancer(return_X_y=True)
X_train, X_test, y_train, y_test = train_test_split(X, y, test_size=0.2, random_state=0)

params = {
    'objective': 'binary:logistic',
    'max_depth': 5,
    'eta': 0.1,
    'silent': 1,
}
booster = xgb.train(params, xgb.DMatrix(X_train, label=y_train), num_boost_round=30)
booster.save_model('xg_breast_cancer.model')

np.savetxt('xg_breast_cancer_test.tsv', X_test, delimiter='\t')
np.savetxt('xg_breast_cancer_true_predictions.tsv', booster.predict(xgb.DMatrix(X_test)), delimiter='\t')
"#
        .to_string()
    }

    fn go_code(&self) -> String {
        go_program(&predict_dense_body(
            "XGEnsembleFromFile",
            "xg_breast_cancer.model",
            "xg_breast_cancer_test.tsv",
            "xg_breast_cancer_predictions.tsv",
        ))
    }

    fn compare(&self, workspace: &Workspace) -> Result<(), CaseError> {
        // XGBoost accumulates in float32; leaves in float64.
        workspace.compare_matrices(
            "xg_breast_cancer_true_predictions.tsv",
            "xg_breast_cancer_predictions.tsv",
            &Tolerance::new(1e-6),
        )?;
        Ok(())
    }
}
