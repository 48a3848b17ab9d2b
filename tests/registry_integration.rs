//! Model bundle persistence across registry instances (process restarts).

use std::sync::Arc;

use tempfile::TempDir;

use teller::classifier::{Classifier, Department, KeywordTable, RoutedBy};
use teller::registry::{BUNDLE_MAGIC, ModelRegistry};

#[tokio::test]
async fn test_bundle_survives_restart() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("categorization_model.rkyv");

    let first = ModelRegistry::new();
    let trained = first.load_or_train(&path).await.unwrap();
    assert_eq!(first.training_runs(), 1);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], BUNDLE_MAGIC);

    let second = ModelRegistry::new();
    let loaded = second.load_or_train(&path).await.unwrap();

    assert_eq!(second.training_runs(), 0);
    assert_eq!(loaded.bundle_id, trained.bundle_id);
    assert_eq!(loaded.labels, trained.labels);
}

#[tokio::test]
async fn test_sequential_loads_share_label_mapping() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("model.rkyv");
    let registry = ModelRegistry::new();

    let a = registry.load_or_train(&path).await.unwrap();
    let b = registry.load_or_train(&path).await.unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    let expected: Vec<String> = {
        let mut names: Vec<String> = Department::ALL
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        names.sort();
        names
    };
    assert_eq!(a.labels, expected);
}

#[tokio::test]
async fn test_classifier_recovers_from_truncated_bundle() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("model.rkyv");
    std::fs::write(&path, b"TLMB\x01").unwrap();

    let registry = Arc::new(ModelRegistry::new());
    let classifier = Classifier::new(
        KeywordTable::builtin(),
        Arc::clone(&registry),
        &path,
        Department::FALLBACK,
    );

    let outcome = classifier.try_classify("RD maturity?").await.unwrap();

    assert_eq!(outcome.stage.routed_by(), RoutedBy::Model);
    assert_eq!(registry.training_runs(), 1);
    assert!(std::fs::read(&path).unwrap().len() > 8);
}

#[tokio::test]
async fn test_retrain_replaces_cached_bundle() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("model.rkyv");
    let registry = ModelRegistry::new();

    let before = registry.load_or_train(&path).await.unwrap();
    let after = registry.retrain(&path).await.unwrap();

    assert_ne!(before.bundle_id, after.bundle_id);
    assert_eq!(registry.training_runs(), 2);
    assert_eq!(
        registry.cached(&path).map(|b| b.bundle_id.clone()),
        Some(after.bundle_id.clone())
    );

    assert!(registry.invalidate(&path));
    assert!(!registry.is_loaded(&path));

    // the persisted retrained bundle is what comes back
    let reloaded = registry.load_or_train(&path).await.unwrap();
    assert_eq!(reloaded.bundle_id, after.bundle_id);
    assert_eq!(registry.training_runs(), 2);
}
