mod db;
mod errors;
mod id;
mod models;
mod storage;
mod store;

pub use db::SqliteStore;
pub use errors::{StoreError, StoreResult};
pub use id::new_entity_id;
pub use models::{Folder, Note, NotePatch};
pub use storage::{
    BackingStore, MemoryStore, FOLDERS_KEY, NOTES_KEY, SELECTED_FOLDER_KEY, SELECTED_NOTE_KEY,
};
pub use store::NoteStore;
