//! LightGBM text-model cases.

use super::go::{go_program, predict_dense_body};
use crate::case::Case;
use crate::compare::Tolerance;
use crate::error::CaseError;
use crate::workspace::Workspace;
use leaves_venv::LibraryVariant;

const LIGHTGBM_VERSIONS: &[&str] = &[
    "2.0.10", "2.0.12", "2.1.0", "2.1.1", "2.1.2", "2.2.0", "2.2.1", "2.2.2", "2.2.3", "2.3.0",
];

/// Binary classifier on the breast cancer dataset.
pub struct LGBinaryBreastCancer;

impl Case for LGBinaryBreastCancer {
    fn name(&self) -> &'static str {
        "LGBinaryBreastCancer"
    }

    fn library(&self) -> LibraryVariant {
        LibraryVariant::LightGBM
    }

    fn versions(&self) -> &'static [&'static str] {
        LIGHTGBM_VERSIONS
    }

    fn python_code(&self) -> String {
        r#"import lightgbm as lgb
import numpy as np
from sklearn import datasets
from sklearn.model_selection import train_test_split

X, y = datasets.load_breast_cancer(return_X_y=True)
X_train, X_test, y_train, y_test = train_test_split(X, y, test_size=0.2, random_state=0)

params = {
    'objective': 'binary',
    'num_leaves': 31,
    'learning_rate': 0.1,
    'verbose': -1,
}
booster = lgb.train(params, lgb.Dataset(X_train, y_train), num_boost_round=30)
booster.save_model('lg_breast_cancer.model')

np.savetxt('lg_breast_cancer_test.tsv', X_test, delimiter='\t')
np.savetxt('lg_breast_cancer_true_predictions.tsv', booster.predict(X_test), delimiter='\t')
"#
        .to_string()
    }

    fn go_code(&self) -> String {
        go_program(&predict_dense_body(
            "LGEnsembleFromFile",
            "lg_breast_cancer.model",
            "lg_breast_cancer_test.tsv",
            "lg_breast_cancer_predictions.tsv",
        ))
    }

    fn compare(&self, workspace: &Workspace) -> Result<(), CaseError> {
        workspace.compare_matrices(
            "lg_breast_cancer_true_predictions.tsv",
            "lg_breast_cancer_predictions.tsv",
            &Tolerance::new(1e-12),
        )?;
        Ok(())
    }
}

/// Multiclass classifier on the iris dataset; one output column per class.
pub struct LGMulticlassIris;

impl Case for LGMulticlassIris {
    fn name(&self) -> &'static str {
        "LGMulticlassIris"
    }

    fn library(&self) -> LibraryVariant {
        LibraryVariant::LightGBM
    }

    fn versions(&self) -> &'static [&'static str] {
        LIGHTGBM_VERSIONS
    }

    fn python_code(&self) -> String {
        r#"import lightgbm as lgb
import numpy as np
from sklearn import datasets
from sklearn.model_selection import train_test_split

X, y = datasets.load_iris(return_X_y=True)
X_train, X_test, y_train, y_test = train_test_split(X, y, test_size=0.3, random_state=0)

params = {
    'objective': 'multiclass',
    'num_class': 3,
    'num_leaves': 15,
    'min_data_in_leaf': 5,
    'verbose': -1,
}
booster = lgb.train(params, lgb.Dataset(X_train, y_train), num_boost_round=20)
booster.save_model('lg_iris.model')

np.savetxt('lg_iris_test.tsv', X_test, delimiter='\t')
np.savetxt('lg_iris_true_predictions.tsv', booster.predict(X_test), delimiter='\t')
"#
        .to_string()
    }

    fn go_code(&self) -> String {
        go_program(&predict_dense_body(
            "LGEnsembleFromFile",
            "lg_iris.model",
            "lg_iris_test.tsv",
            "lg_iris_predictions.tsv",
        ))
    }

    fn compare(&self, workspace: &Workspace) -> Result<(), CaseError> {
        workspace.compare_matrices(
            "lg_iris_true_predictions.tsv",
            "lg_iris_predictions.tsv",
            &Tolerance::new(1e-12),
        )?;
        Ok(())
    }
}
