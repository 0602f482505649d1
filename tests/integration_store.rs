use ocean_notes::{
    BackingStore, NotePatch, NoteStore, SqliteStore, FOLDERS_KEY, NOTES_KEY, SELECTED_NOTE_KEY,
};
use std::path::Path;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

fn open_store(path: &Path) -> NoteStore<SqliteStore> {
    let backing = SqliteStore::open(path).expect("open backing store");
    NoteStore::open(backing).expect("open note store")
}

#[test]
fn state_round_trips_across_reopen() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("notes.sqlite3");

    let mut store = open_store(&path);
    let work = store
        .create_folder("Work")
        .expect("create folder")
        .expect("accepted name");
    let note = store.create_note().expect("create note");
    store
        .update_note(
            &note.id,
            NotePatch {
                title: Some("Kickoff".to_string()),
                content: Some("agenda".to_string()),
                ..NotePatch::default()
            },
        )
        .expect("update note")
        .expect("note found");
    store.duplicate_note(&note.id).expect("duplicate").expect("source found");
    store.select_folder(Some(&work.id)).expect("select folder");

    let folders = store.folders().to_vec();
    let notes = store.notes().to_vec();
    let selected_folder = store.selected_folder_id().map(ToString::to_string);
    let selected_note = store.selected_note_id().map(ToString::to_string);
    drop(store);

    let reopened = open_store(&path);
    assert_eq!(reopened.folders(), folders.as_slice());
    assert_eq!(reopened.notes(), notes.as_slice());
    assert_eq!(
        reopened.selected_folder_id().map(ToString::to_string),
        selected_folder
    );
    assert_eq!(
        reopened.selected_note_id().map(ToString::to_string),
        selected_note
    );
}

#[test]
fn corrupt_payloads_degrade_to_empty_collections() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("notes.sqlite3");

    let mut backing = SqliteStore::open(&path).expect("open backing store");
    backing.set(NOTES_KEY, "{not json").expect("seed notes");
    backing.set(FOLDERS_KEY, "[[[").expect("seed folders");
    backing
        .set(SELECTED_NOTE_KEY, "dangling-id")
        .expect("seed selection");

    let store = NoteStore::open(backing).expect("open note store");
    assert!(store.notes().is_empty());
    assert!(store.folders().is_empty());
    // Selection is independent of the collections and hydrates as-is.
    assert_eq!(store.selected_note_id(), Some("dangling-id"));
    assert_eq!(store.selected_note(), None);
}

#[test]
fn cleared_selection_leaves_no_key_behind() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("notes.sqlite3");

    let mut store = open_store(&path);
    let note = store.create_note().expect("create note");
    drop(store);

    let backing = SqliteStore::open(&path).expect("reopen backing store");
    assert_eq!(
        backing.get(SELECTED_NOTE_KEY).expect("get selection"),
        Some(note.id.clone())
    );

    let mut store = NoteStore::open(backing).expect("reopen note store");
    assert!(store.delete_note(&note.id).expect("delete note"));
    drop(store);

    let backing = SqliteStore::open(&path).expect("reopen backing store");
    assert_eq!(backing.get(SELECTED_NOTE_KEY).expect("get selection"), None);

    let store = NoteStore::open(backing).expect("reopen note store");
    assert_eq!(store.selected_note_id(), None);
}
