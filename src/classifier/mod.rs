//! Query classification into departments.
//!
//! Two stages over the same normalised text ([`preprocess`]):
//!
//! 1. Keyword counting per department ([`KeywordTable`]). The strictly highest count
//!    wins; ties resolve to the department registered first.
//! 2. If no department has a hit, a TF-IDF + multinomial Naive Bayes bundle from the
//!    [`ModelRegistry`](crate::registry::ModelRegistry) predicts the label.

mod classifier;
mod department;
mod error;
mod keywords;
mod preprocess;


pub use classifier::{ClassificationOutcome, ClassificationStage, Classifier, RoutedBy};
pub use department::Department;
pub use error::ClassifierError;
pub use keywords::{DepartmentKeywords, KeywordConfig, KeywordScores, KeywordTable};
pub use preprocess::{preprocess, tokenize};
