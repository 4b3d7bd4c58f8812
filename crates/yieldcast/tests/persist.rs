//! Artifact round-trips through the file and memory stores.

use approx::assert_abs_diff_eq;
use tempfile::tempdir;

use yieldcast::testing::synthetic_records;
use yieldcast::training::{BoostParams, RidgeParams};
use yieldcast::{
    Artifact, ArtifactStore, BoostedForecaster, DatasetSchema, GuardrailConfig, JsonFileStore,
    MemoryStore, ModelKind, RidgeForecaster, TrainingMode,
};

fn trained(kind: ModelKind, mode: TrainingMode) -> (Artifact, Vec<yieldcast::RawRecord>) {
    let records = synthetic_records(40, 21);
    let dataset = DatasetSchema::default().resolve(&records, mode);
    let artifact = match kind {
        ModelKind::Ridge => RidgeForecaster::train(&dataset, &RidgeParams::default()).unwrap().into(),
        ModelKind::Boosted => BoostedForecaster::train(&dataset, &BoostParams::default()).unwrap().into(),
    };
    (artifact, records)
}

#[test]
fn file_store_roundtrip_preserves_predictions() {
    let dir = tempdir().unwrap();
    let schema = DatasetSchema::default();

    for (kind, mode) in [(ModelKind::Ridge, TrainingMode::Total), (ModelKind::Boosted, TrainingMode::DailyRate)] {
        let (artifact, records) = trained(kind, mode);
        let mut store = JsonFileStore::new(dir.path().join(format!("{}.json", kind.as_str())));
        store.save(&artifact).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, artifact);

        match (&artifact, &loaded) {
            (Artifact::Ridge(a), Artifact::Ridge(b)) => {
                for record in &records {
                    let (pa, pb) = (a.predict_record(record, &schema).unwrap(), b.predict_record(record, &schema).unwrap());
                    assert_abs_diff_eq!(pa.mean, pb.mean, epsilon = 1e-12);
                }
            }
            (Artifact::Boosted(a), Artifact::Boosted(b)) => {
                let config = GuardrailConfig::default();
                for record in &records {
                    assert_eq!(
                        a.predict_record(record, &schema, &config).unwrap(),
                        b.predict_record(record, &schema, &config).unwrap()
                    );
                }
            }
            _ => panic!("artifact kind changed on load"),
        }
    }
}

#[test]
fn save_replaces_and_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    let mut store = JsonFileStore::new(&path);

    let (first, _) = trained(ModelKind::Ridge, TrainingMode::DailyRate);
    let (second, _) = trained(ModelKind::Boosted, TrainingMode::DailyRate);
    store.save(&first).unwrap();
    store.save(&second).unwrap();

    assert_eq!(Artifact::load_json(&path).unwrap(), second);
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["model.json".to_string()]);
}

#[test]
fn missing_file_loads_as_none() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn memory_store_keeps_last_artifact() {
    let mut store = MemoryStore::new();
    let (first, _) = trained(ModelKind::Ridge, TrainingMode::DailyRate);
    let (second, _) = trained(ModelKind::Boosted, TrainingMode::Total);
    store.save(&first).unwrap();
    store.save(&second).unwrap();
    assert_eq!(store.load().unwrap(), Some(second));
}

#[test]
fn save_json_writes_readable_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("direct.json");
    let (artifact, _) = trained(ModelKind::Boosted, TrainingMode::Total);
    artifact.save_json(&path).unwrap();
    let loaded = Artifact::load_json(&path).unwrap();
    assert_eq!(loaded.kind(), ModelKind::Boosted);
    assert_eq!(loaded.meta().mode, TrainingMode::Total);
}
