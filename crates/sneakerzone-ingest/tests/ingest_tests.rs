use std::fs;
use tempfile::TempDir;

use sneakerzone_core::error::AccessError;
use sneakerzone_core::{BucketKey, CatalogIndex, IngestionTally, Segment};
use sneakerzone_ingest::{
    ingest, AbortReason, EntryOutcome, FsAccess, IngestError, IngestObserver, Ingestor, MemoryAccess,
    RejectReason, StopSignal,
};

fn models(index: &CatalogIndex, brand: &str, segment: Segment) -> Vec<String> {
    index
        .get(&BucketKey::new(brand, segment))
        .map(|b| b.records().map(|r| r.name.model.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn folder_with_mixed_files() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("A_Hombre_X_Red_100_40.jpg"), b"img").unwrap();
    fs::create_dir(dir.join("mujer")).unwrap();
    fs::write(dir.join("mujer/A_Mujer_Y_Blue_200_38-39.png"), b"img").unwrap();
    fs::write(dir.join("readme.txt"), b"notes").unwrap();
    fs::create_dir_all(dir.join("b/unisex")).unwrap();
    fs::write(dir.join("b/unisex/B_Unisex_Z_White_50_41.gif"), b"img").unwrap();

    let mut index = CatalogIndex::new();
    let tally = ingest(&FsAccess, &dir.to_path_buf(), &mut index).expect("ingest");

    assert_eq!(tally, IngestionTally { accepted: 3, rejected: 1 });
    assert_eq!(index.len(), 3, "one bucket per brand/segment pair");
    let mut keys: Vec<String> = index.buckets().map(|b| b.key().to_string()).collect();
    keys.sort();
    assert_eq!(keys, vec!["a/Hombre", "a/Mujer", "b/Unisex"]);
    for (brand, segment, model) in [("a", Segment::Men, "X"), ("a", Segment::Women, "Y"), ("b", Segment::Unisex, "Z")] {
        assert_eq!(models(&index, brand, segment), vec![model], "{brand}/{segment}");
    }
    let record = index
        .get(&BucketKey::new("a", Segment::Women))
        .and_then(|b| b.records().next())
        .expect("record");
    assert_eq!(record.name.sizes, vec!["38", "39"]);
    assert!(record.source.as_str().starts_with("file://"));
}

#[cfg(unix)]
#[test]
fn symlinked_photos_are_catalogued() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    let photos = tmp.path().join("photos");
    fs::create_dir(&photos).unwrap();
    fs::write(photos.join("A_Hombre_X_Red_100_40.jpg"), b"img").unwrap();
    let cat = tmp.path().join("cat");
    fs::create_dir(&cat).unwrap();
    symlink(photos.join("A_Hombre_X_Red_100_40.jpg"), cat.join("A_Hombre_X_Red_100_40.jpg")).unwrap();
    symlink(photos.join("gone.jpg"), cat.join("A_Mujer_Y_Blue_200_38.jpg")).unwrap();
    symlink(tmp.path(), cat.join("up")).unwrap();

    let mut index = CatalogIndex::new();
    let tally = ingest(&FsAccess, &cat, &mut index).expect("ingest");
    assert_eq!(tally, IngestionTally { accepted: 1, rejected: 1 }, "dangling link is a read rejection");
    assert_eq!(models(&index, "a", Segment::Men), vec!["X"]);
}

#[test]
fn tally_counts_every_yielded_file() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_files(root, &[
        "Nike_Hombre_Air_Black_1200_42.bmp",
        "Nike_Hombre_Air_Black_1200_42.jpg",
        "Nike_Niño_Air_Black_1200_30.jpg",
        "Nike_Hombre_Air_1200_42.jpg",
        "notes",
    ]);
    let sub = tree.add_dir(root, "más");
    tree.add_files(sub, &["Vans_Mujer_Old_Negro_60_37-38.webp", ".DS_Store"]);

    let mut index = CatalogIndex::new();
    let tally = ingest(&tree, &root, &mut index).expect("ingest");
    assert_eq!(tally.total(), 7);
    assert_eq!(tally.accepted, 2);
    assert_eq!(tally.rejected, 5);
}

#[test]
fn later_files_land_in_front() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_files(root, &["A_Hombre_First_Red_100_40.jpg", "A_Hombre_Second_Red_100_40.jpg"]);

    let mut index = CatalogIndex::new();
    ingest(&tree, &root, &mut index).expect("ingest");
    assert_eq!(models(&index, "a", Segment::Men), vec!["Second", "First"]);
}

#[test]
fn repeated_runs_accumulate_into_existing_buckets() {
    let mut first = MemoryAccess::new();
    let root = first.root();
    first.add_files(root, &["Nike_Hombre_Air_Negro_100_42.jpg"]);
    let mut second = MemoryAccess::new();
    let root2 = second.root();
    second.add_files(root2, &["NIKE_hombre_Zoom_Blanco_150_43.png", "Nike_Mujer_Air_Rosa_100_38.png"]);

    let mut index = CatalogIndex::new();
    let t1 = ingest(&first, &root, &mut index).expect("first run");
    let t2 = ingest(&second, &root2, &mut index).expect("second run");

    assert_eq!(t1, IngestionTally { accepted: 1, rejected: 0 });
    assert_eq!(t2, IngestionTally { accepted: 2, rejected: 0 }, "each run reports only itself");
    assert_eq!(index.len(), 2);
    assert_eq!(models(&index, "nike", Segment::Men), vec!["Zoom", "Air"]);
    assert_eq!(index.brands().collect::<Vec<_>>(), vec!["Nike"], "first casing wins");
}

#[test]
fn segment_outside_layout_falls_back_to_unisex() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_files(root, &["Crocs_Hombre_Classic_Verde_45_42.jpg", "Crocs_Unisex_Bayaband_Azul_50_40.jpg"]);

    let mut index = CatalogIndex::new();
    index.set_layout("crocs", vec![Segment::Unisex]);
    let tally = ingest(&tree, &root, &mut index).expect("ingest");

    assert_eq!(tally.accepted, 2);
    assert_eq!(models(&index, "crocs", Segment::Unisex), vec!["Bayaband", "Classic"]);
    assert!(index.get(&BucketKey::new("crocs", Segment::Men)).is_none());
}

#[test]
fn unresolvable_bucket_is_rejected() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_files(root, &["Fila_Hombre_Disruptor_Blanco_70_42.jpg"]);

    let mut index = CatalogIndex::new();
    index.set_layout("Fila", vec![Segment::Women]);
    let tally = ingest(&tree, &root, &mut index).expect("ingest");
    assert_eq!(tally, IngestionTally { accepted: 0, rejected: 1 });
    assert!(index.is_empty());
}

#[test]
fn unreadable_file_is_rejected_and_walk_continues() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    let bad = tree.add_file(root, "A_Hombre_Locked_Red_100_40.jpg");
    tree.fail_read(bad, || AccessError::PermissionDenied("locked".into()));
    tree.add_file(root, "A_Hombre_Open_Red_100_40.jpg");

    let mut index = CatalogIndex::new();
    let tally = ingest(&tree, &root, &mut index).expect("ingest");
    assert_eq!(tally, IngestionTally { accepted: 1, rejected: 1 });
    assert_eq!(models(&index, "a", Segment::Men), vec!["Open"]);
}

#[test]
fn unreadable_subdirectory_is_skipped() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    let locked = tree.add_dir(root, "privado");
    tree.add_file(locked, "A_Hombre_Hidden_Red_100_40.jpg");
    tree.fail_listing(locked, || AccessError::PermissionDenied("privado".into()));
    tree.add_file(root, "A_Hombre_Shown_Red_100_40.jpg");

    let mut index = CatalogIndex::new();
    let tally = ingest(&tree, &root, &mut index).expect("ingest");
    assert_eq!(tally, IngestionTally { accepted: 1, rejected: 0 });
}

#[test]
fn cancelled_run_touches_nothing() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_files(root, &["A_Hombre_X_Red_100_40.jpg"]);

    let stop = StopSignal::new();
    stop.stop();
    let mut index = CatalogIndex::new();
    let err = Ingestor::new(&tree).with_stop(stop).run(&root, &mut index).unwrap_err();
    assert!(err.is_cancellation());
    assert!(index.is_empty());
}

#[test]
fn denied_root_aborts() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_files(root, &["A_Hombre_X_Red_100_40.jpg"]);
    tree.fail_listing(root, || AccessError::PermissionDenied("/".into()));

    let mut index = CatalogIndex::new();
    let err = ingest(&tree, &root, &mut index).unwrap_err();
    assert!(matches!(err, IngestError::Aborted(AbortReason::AccessDenied(_))));
    assert!(!err.is_cancellation());
}

#[test]
fn missing_root_folder_aborts() {
    let tmp = TempDir::new().unwrap();
    let mut index = CatalogIndex::new();
    let err = ingest(&FsAccess, &tmp.path().join("nope"), &mut index).unwrap_err();
    assert!(matches!(err, IngestError::Aborted(AbortReason::AccessDenied(_))));
}

#[test]
fn host_fault_mid_walk_keeps_earlier_records() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_file(root, "A_Hombre_Before_Red_100_40.jpg");
    let broken = tree.add_dir(root, "broken");
    tree.fail_listing(broken, || AccessError::Fault("device removed".into()));
    tree.add_file(root, "A_Hombre_After_Red_100_40.jpg");

    let mut index = CatalogIndex::new();
    let err = ingest(&tree, &root, &mut index).unwrap_err();
    assert!(matches!(err, IngestError::Host { .. }));
    assert_eq!(models(&index, "a", Segment::Men), vec!["Before"], "no rollback");
}

#[derive(Default)]
struct Recorder {
    extension_rejects: usize,
    accepted: Vec<String>,
    completed: Option<(IngestionTally, usize)>,
}

impl IngestObserver for Recorder {
    fn on_entry(&mut self, _name: &str, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Accepted(key) => self.accepted.push(key.to_string()),
            EntryOutcome::Rejected(RejectReason::Extension(_)) => self.extension_rejects += 1,
            EntryOutcome::Rejected(_) => {}
        }
    }

    fn on_complete(&mut self, index: &CatalogIndex, tally: &IngestionTally) {
        self.completed = Some((*tally, index.record_count()));
    }
}

#[test]
fn observer_sees_each_entry_and_completion() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_files(root, &["Nike_Hombre_Air_Black_1200_42.bmp", "Nike_Hombre_Air_Black_1200_42.jpg"]);

    let mut recorder = Recorder::default();
    let mut index = CatalogIndex::new();
    let tally = Ingestor::new(&tree)
        .with_observer(&mut recorder)
        .run(&root, &mut index)
        .expect("ingest");

    assert_eq!(recorder.extension_rejects, 1, ".bmp is turned away before parsing");
    assert_eq!(recorder.accepted, vec!["nike/Hombre"]);
    assert_eq!(recorder.completed, Some((tally, 1)));
}

struct StopAfterFirst(StopSignal);

impl IngestObserver for StopAfterFirst {
    fn on_entry(&mut self, _name: &str, _outcome: &EntryOutcome) {
        self.0.stop();
    }
}

#[test]
fn stop_mid_run_returns_partial_tally() {
    let mut tree = MemoryAccess::new();
    let root = tree.root();
    tree.add_files(root, &["A_Hombre_X_Red_100_40.jpg", "A_Hombre_Y_Red_100_40.jpg", "A_Hombre_Z_Red_100_40.jpg"]);

    let stop = StopSignal::new();
    let mut observer = StopAfterFirst(stop.clone());
    let mut index = CatalogIndex::new();
    let tally = Ingestor::new(&tree)
        .with_stop(stop)
        .with_observer(&mut observer)
        .run(&root, &mut index)
        .expect("ingest");
    assert_eq!(tally, IngestionTally { accepted: 1, rejected: 0 });
    assert_eq!(index.record_count(), 1);
}
