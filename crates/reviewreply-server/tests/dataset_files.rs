//! Dataset tooling against files on disk

use reviewreply_classifiers::{ReviewProcessor, TextProcessingConfig};
use reviewreply_server::dataset::{self, DatasetReview, TrainingPair};

#[test]
fn test_synth_prepare_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let reviews_path = dir.path().join("reviews.json");
    let pairs_path = dir.path().join("training.json");

    dataset::write_json(&reviews_path, &dataset::synthetic_reviews()).unwrap();
    let reviews = dataset::load_reviews(&reviews_path).unwrap();
    assert_eq!(reviews.len(), 16);

    let processor = ReviewProcessor::from_config(&TextProcessingConfig::default()).unwrap();
    let pairs = dataset::prepare_training_pairs(&reviews, &processor);
    dataset::write_json(&pairs_path, &pairs).unwrap();

    let written: Vec<TrainingPair> =
        serde_json::from_str(&std::fs::read_to_string(&pairs_path).unwrap()).unwrap();
    assert_eq!(written, pairs);
    assert!(written.iter().all(|p| p.input.starts_with("Avis client: ")));
}

#[test]
fn test_missing_source_defaults_to_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    std::fs::write(
        &path,
        r#"[{"review_text": "Très bon produit", "rating": 4}, {"review_text": "Bof", "rating": 3, "source": "shop"}]"#,
    )
    .unwrap();

    let reviews = dataset::load_reviews(&path).unwrap();
    assert_eq!(
        reviews[0],
        DatasetReview {
            review_text: "Très bon produit".to_string(),
            rating: 4,
            source: "unknown".to_string(),
        }
    );

    let stats = dataset::dataset_stats(&reviews);
    assert_eq!(stats.by_source["unknown"], 1);
    assert_eq!(stats.by_source["shop"], 1);
    assert_eq!(stats.avg_text_length, 9.5);
}

#[test]
fn test_invalid_dataset_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "not json").unwrap();

    let err = dataset::load_reviews(&path).unwrap_err();
    assert_eq!(err.kind(), "serialization");

    let err = dataset::load_reviews(&dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.kind(), "io");
}
