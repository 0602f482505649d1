use crate::errors::{StoreError, StoreResult};
use crate::id::new_entity_id;
use crate::models::{Folder, Note, NotePatch};
use crate::storage::{
    decode_collection, BackingStore, FOLDERS_KEY, NOTES_KEY, SELECTED_FOLDER_KEY,
    SELECTED_NOTE_KEY,
};
use chrono::Utc;

/// In-memory note/folder collections bound to an injected backing store.
///
/// Every mutation updates the in-memory state and immediately writes the
/// affected collection back, whole. Backing-store failures propagate to the
/// caller; there is no retry.
#[derive(Debug)]
pub struct NoteStore<S: BackingStore> {
    backing: S,
    folders: Vec<Folder>,
    notes: Vec<Note>,
    selected_folder_id: Option<String>,
    selected_note_id: Option<String>,
}

impl<S: BackingStore> NoteStore<S> {
    /// Hydrates the store from the backing medium. Missing or corrupt
    /// collection payloads come back empty; absent selection keys decode
    /// to no selection.
    pub fn open(backing: S) -> StoreResult<Self> {
        let folders = decode_collection(FOLDERS_KEY, backing.get(FOLDERS_KEY)?);
        let notes = decode_collection(NOTES_KEY, backing.get(NOTES_KEY)?);
        let selected_folder_id = backing.get(SELECTED_FOLDER_KEY)?;
        let selected_note_id = backing.get(SELECTED_NOTE_KEY)?;
        Ok(Self {
            backing,
            folders,
            notes,
            selected_folder_id,
            selected_note_id,
        })
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_folder_id(&self) -> Option<&str> {
        self.selected_folder_id.as_deref()
    }

    pub fn selected_note_id(&self) -> Option<&str> {
        self.selected_note_id.as_deref()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        let id = self.selected_note_id.as_deref()?;
        self.notes.iter().find(|note| note.id == id)
    }

    /// Creates a folder and selects it. Blank names are a silent no-op.
    /// Duplicate names are allowed.
    pub fn create_folder(&mut self, name: &str) -> StoreResult<Option<Folder>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let folder = Folder {
            id: new_entity_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.folders.insert(0, folder.clone());
        self.persist_folders()?;
        self.select_folder(Some(&folder.id))?;
        Ok(Some(folder))
    }

    /// Renames a folder. Blank names and unknown ids are silent no-ops.
    pub fn rename_folder(&mut self, folder_id: &str, new_name: &str) -> StoreResult<Option<Folder>> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(None);
        }
        let Some(folder) = self.folders.iter_mut().find(|folder| folder.id == folder_id) else {
            return Ok(None);
        };
        folder.name = new_name.to_string();
        let renamed = folder.clone();
        self.persist_folders()?;
        Ok(Some(renamed))
    }

    /// Deletes a folder, re-filing its notes into the Inbox rather than
    /// deleting them, and drops the folder filter if it pointed here.
    pub fn delete_folder(&mut self, folder_id: &str) -> StoreResult<bool> {
        let before = self.folders.len();
        self.folders.retain(|folder| folder.id != folder_id);
        if self.folders.len() == before {
            return Ok(false);
        }

        let now = Utc::now();
        let mut refiled = 0usize;
        for note in &mut self.notes {
            if note.folder_id.as_deref() == Some(folder_id) {
                note.folder_id = None;
                note.updated_at = now;
                refiled += 1;
            }
        }
        if refiled > 0 {
            self.persist_notes()?;
        }
        self.persist_folders()?;

        if self.selected_folder_id.as_deref() == Some(folder_id) {
            self.select_folder(None)?;
        }
        tracing::debug!(folder_id, refiled, "deleted folder");
        Ok(true)
    }

    /// Creates an empty note in the currently selected folder (or the
    /// Inbox) and selects it.
    pub fn create_note(&mut self) -> StoreResult<Note> {
        let now = Utc::now();
        let note = Note {
            id: new_entity_id(),
            title: String::new(),
            content: String::new(),
            folder_id: self.selected_folder_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(0, note.clone());
        self.persist_notes()?;
        self.select_note(Some(&note.id))?;
        Ok(note)
    }

    /// Clones a note under a fresh identifier and timestamps, marks the
    /// title as a copy, and selects it. Unknown ids are a no-op.
    pub fn duplicate_note(&mut self, note_id: &str) -> StoreResult<Option<Note>> {
        let Some(base) = self.notes.iter().find(|note| note.id == note_id).cloned() else {
            return Ok(None);
        };
        let now = Utc::now();
        let copy = Note {
            id: new_entity_id(),
            title: format!("{} (Copy)", base.title),
            content: base.content,
            folder_id: base.folder_id,
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(0, copy.clone());
        self.persist_notes()?;
        self.select_note(Some(&copy.id))?;
        Ok(Some(copy))
    }

    /// Deletes a note, clearing the open-note selection if it was this one.
    pub fn delete_note(&mut self, note_id: &str) -> StoreResult<bool> {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != note_id);
        if self.notes.len() == before {
            return Ok(false);
        }
        self.persist_notes()?;
        if self.selected_note_id.as_deref() == Some(note_id) {
            self.select_note(None)?;
        }
        Ok(true)
    }

    /// Merges the patch into a note, refreshing `updated_at`. Unknown note
    /// ids are a no-op; a patch pointing at a missing folder is rejected.
    pub fn update_note(&mut self, note_id: &str, patch: NotePatch) -> StoreResult<Option<Note>> {
        if let Some(Some(target)) = patch.folder_id.as_ref() {
            self.require_folder(target)?;
        }
        let Some(note) = self.notes.iter_mut().find(|note| note.id == note_id) else {
            return Ok(None);
        };
        let NotePatch {
            title,
            content,
            folder_id,
        } = patch;
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        if let Some(folder_id) = folder_id {
            note.folder_id = folder_id;
        }
        note.updated_at = Utc::now();
        let updated = note.clone();
        self.persist_notes()?;
        Ok(Some(updated))
    }

    /// Moves a note into a folder (`None` = Inbox), refreshing `updated_at`.
    /// The target folder must exist.
    pub fn move_note_to_folder(
        &mut self,
        note_id: &str,
        folder_id: Option<&str>,
    ) -> StoreResult<Option<Note>> {
        if let Some(target) = folder_id {
            self.require_folder(target)?;
        }
        let Some(note) = self.notes.iter_mut().find(|note| note.id == note_id) else {
            return Ok(None);
        };
        note.folder_id = folder_id.map(ToString::to_string);
        note.updated_at = Utc::now();
        let moved = note.clone();
        self.persist_notes()?;
        Ok(Some(moved))
    }

    /// Notes matching the folder filter (`None` = all notes), most recently
    /// updated first. Recomputed on every call.
    pub fn filtered_notes(&self, folder_filter: Option<&str>) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| match folder_filter {
                Some(filter) => note.folder_id.as_deref() == Some(filter),
                None => true,
            })
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        notes
    }

    /// `filtered_notes` over the current folder selection.
    pub fn visible_notes(&self) -> Vec<Note> {
        self.filtered_notes(self.selected_folder_id.as_deref())
    }

    pub fn select_folder(&mut self, folder_id: Option<&str>) -> StoreResult<()> {
        self.selected_folder_id = folder_id.map(ToString::to_string);
        Self::persist_selection(&mut self.backing, SELECTED_FOLDER_KEY, folder_id)
    }

    pub fn select_note(&mut self, note_id: Option<&str>) -> StoreResult<()> {
        self.selected_note_id = note_id.map(ToString::to_string);
        Self::persist_selection(&mut self.backing, SELECTED_NOTE_KEY, note_id)
    }

    fn require_folder(&self, folder_id: &str) -> StoreResult<()> {
        if self.folders.iter().any(|folder| folder.id == folder_id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!(
                "No folder with id {}",
                folder_id
            )))
        }
    }

    fn persist_folders(&mut self) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.folders)?;
        self.backing.set(FOLDERS_KEY, &payload)
    }

    fn persist_notes(&mut self) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.notes)?;
        self.backing.set(NOTES_KEY, &payload)
    }

    // Selection persists as a plain string; clearing removes the key, so
    // "no selection" and "never selected" are indistinguishable on reload.
    fn persist_selection(backing: &mut S, key: &str, value: Option<&str>) -> StoreResult<()> {
        match value {
            Some(id) => backing.set(key, id),
            None => backing.remove(key),
        }
    }
}
