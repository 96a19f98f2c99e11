//! scikit-learn gradient boosting cases.

use super::go::{go_program, predict_dense_body};
use crate::case::Case;
use crate::compare::Tolerance;
use crate::error::CaseError;
use crate::workspace::Workspace;
use leaves_venv::LibraryVariant;

const SKLEARN_VERSIONS: &[&str] = &["0.19.2", "0.20.4", "0.21.3"];

/// `GradientBoostingClassifier` on the breast cancer dataset, loaded from a pickle.
pub struct SKGradientBoostingBreastCancer;

impl Case for SKGradientBoostingBreastCancer {
    fn name(&self) -> &'static str {
        "SKGradientBoostingBreastCancer"
    }

    fn library(&self) -> LibraryVariant {
        LibraryVariant::Sklearn
    }

    fn versions(&self) -> &'static [&'static str] {
        SKLEARN_VERSIONS
    }

    fn python_code(&self) -> String {
        r#"import pickle

import numpy as np
from sklearn import datasets
from sklearn.ensemble import GradientBoostingClassifier
from sklearn.model_selection import train_test_split

X, y = datasets.load_breast_cancer(return_X_y=True)
X_train, X_test, y_train, y_test = train_test_split(X, y, test_size=0.2, random_state=0)

clf = GradientBoostingClassifier(n_estimators=30, max_depth=3, random_state=0)
clf.fit(X_train, y_train)
with open('sk_breast_cancer.pickle', 'wb') as fout:
    pickle.dump(clf, fout, protocol=0)

np.savetxt('sk_breast_cancer_test.tsv', X_test, delimiter='\t')
np.savetxt('sk_breast_cancer_true_predictions.tsv', clf.predict_proba(X_test)[:, 1], delimiter='\t')
"#
        .to_string()
    }

    fn go_code(&self) -> String {
        go_program(&predict_dense_body(
            "SKEnsembleFromFile",
            "sk_breast_cancer.pickle",
            "sk_breast_cancer_test.tsv",
            "sk_breast_cancer_predictions.tsv",
        ))
    }

    fn compare(&self, workspace: &Workspace) -> Result<(), CaseError> {
        workspace.compare_matrices(
            "sk_breast_cancer_true_predictions.tsv",
            "sk_breast_cancer_predictions.tsv",
            &Tolerance::new(1e-12),
        )?;
        Ok(())
    }
}
