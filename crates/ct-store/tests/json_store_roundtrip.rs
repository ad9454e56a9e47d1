use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ct_core::{DeviceId, SeriesSample, SeriesStore, StoreError};
use ct_store::{JsonSeriesStore, SeriesRecord};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

#[test]
fn save_list_load_roundtrip() {
    let root = unique_temp_dir("ct_store_roundtrip");
    let store = JsonSeriesStore::new(&root).expect("failed to create store");

    let id = DeviceId::new("freezer-07");
    let series = vec![
        SeriesSample::new(1_704_067_200_000, -18.2, 40.0),
        SeriesSample::new(1_704_067_260_000, -18.4, 40.5),
    ];
    store.save_series(&id, &series).expect("failed to save");

    assert!(store.has_device(&id));
    assert_eq!(store.list_devices().expect("list"), vec![id.clone()]);

    let loaded = store
        .load_series(&id)
        .expect("failed to load")
        .expect("series present");
    assert_eq!(loaded, series);

    let raw = fs::read_to_string(root.join("freezer-07.json")).expect("read file");
    let records: Vec<SeriesRecord> = serde_json::from_str(&raw).expect("records");
    assert_eq!(records[0].device_id, "freezer-07");
    assert_eq!(records[0].timestamp, "2024-01-01T00:00:00.000Z");

    store.delete_device(&id).expect("delete");
    assert!(store.load_series(&id).expect("load").is_none());
    let _ = fs::remove_dir_all(root);
}

#[test]
fn unknown_device_is_absent() {
    let root = unique_temp_dir("ct_store_absent");
    let store = JsonSeriesStore::new(&root).expect("failed to create store");
    assert!(store.load_series(&DeviceId::new("nope")).unwrap().is_none());
    assert!(store.list_devices().unwrap().is_empty());
    let _ = fs::remove_dir_all(root);
}

#[test]
fn path_like_ids_are_rejected() {
    let root = unique_temp_dir("ct_store_ids");
    let store = JsonSeriesStore::new(&root).expect("failed to create store");
    for bad in ["", "../escape", "a/b", ".hidden"] {
        let err = store.save_series(&DeviceId::new(bad), &[]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArg { .. }), "{bad}");
    }
    let _ = fs::remove_dir_all(root);
}

#[test]
fn corrupt_file_is_an_encoding_error() {
    let root = unique_temp_dir("ct_store_corrupt");
    let store = JsonSeriesStore::new(&root).expect("failed to create store");
    fs::write(root.join("d1.json"), "{not json").unwrap();
    let err = store.load_series(&DeviceId::new("d1")).unwrap_err();
    assert!(matches!(err, StoreError::Encoding { .. }));
    let _ = fs::remove_dir_all(root);
}
