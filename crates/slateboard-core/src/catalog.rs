//! Named-board catalog.
//!
//! Persists each board as an independent record in a [`KeyedStore`] and
//! keeps a listing ordered newest first. The catalog is deliberately
//! separate from [`crate::engine::BoardEngine`]: saving captures whatever
//! snapshot the caller hands over, and loading hands a snapshot back for
//! the caller to install.

use crate::board::BoardSnapshot;
use crate::error::{EngineError, EngineResult};
use crate::storage::{BoxFuture, KeyedStore, StoreError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Store key prefix for catalog records. Uuids are hyphenated hex, so the
/// full key survives file-name sanitization unchanged.
const BOARD_KEY_PREFIX: &str = "board-";

/// External image-hosting collaborator. Uploads encoded PNG bytes under a
/// display name; resolves to a public URL.
pub trait ImageHost: Send + Sync {
    fn upload(&self, png: &[u8], name: &str) -> BoxFuture<'_, EngineResult<String>>;
}

/// One catalog record: a named board with its creation time and an optional
/// hosted preview image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBoard {
    pub id: Uuid,
    pub name: String,
    /// Unix-epoch milliseconds.
    pub created_at: u64,
    pub data: BoardSnapshot,
    #[serde(rename = "previewURL", default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// The board catalog over a pluggable store.
pub struct BoardCatalog {
    store: Box<dyn KeyedStore>,
}

impl BoardCatalog {
    pub fn new(store: Box<dyn KeyedStore>) -> Self {
        Self { store }
    }

    /// Persist `snapshot` under a fresh id. The record is written before
    /// this returns; a failed write leaves no partial entry behind.
    pub fn save(&self, name: &str, snapshot: &BoardSnapshot) -> EngineResult<SavedBoard> {
        let board = SavedBoard {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now_millis(),
            data: snapshot.clone(),
            preview_url: None,
        };
        self.write(&board)?;
        debug!("catalog: saved board {} ({})", board.name, board.id);
        Ok(board)
    }

    /// All records, newest first. Records that fail to parse are skipped
    /// so one corrupt entry cannot take the whole catalog down.
    pub fn list(&self) -> EngineResult<Vec<SavedBoard>> {
        let keys = self.store.keys().map_err(store_error)?;
        let mut boards = Vec::new();
        for key in keys {
            if !key.starts_with(BOARD_KEY_PREFIX) {
                continue;
            }
            let Some(value) = self.store.get(&key).map_err(store_error)? else {
                continue;
            };
            match serde_json::from_str::<SavedBoard>(&value) {
                Ok(board) => boards.push(board),
                Err(err) => warn!("catalog: skipping corrupt record {}: {}", key, err),
            }
        }
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    /// The snapshot stored under `id`.
    pub fn load(&self, id: Uuid) -> EngineResult<BoardSnapshot> {
        Ok(self.read(id)?.data)
    }

    /// Remove the record under `id`. Removing an unknown id is a no-op.
    pub fn delete(&self, id: Uuid) -> EngineResult<()> {
        self.store.remove(&board_key(id)).map_err(store_error)
    }

    /// Attach a hosted preview URL to an existing record.
    pub fn attach_preview(&self, id: Uuid, url: &str) -> EngineResult<()> {
        let mut board = self.read(id)?;
        board.preview_url = Some(url.to_string());
        self.write(&board)
    }

    /// Save, then upload a preview raster and attach its URL. The upload is
    /// best effort: the board is already persisted, so a failed upload only
    /// costs the preview.
    pub async fn save_with_preview(
        &self,
        name: &str,
        snapshot: &BoardSnapshot,
        png: &[u8],
        host: &dyn ImageHost,
    ) -> EngineResult<SavedBoard> {
        let mut board = self.save(name, snapshot)?;
        match host.upload(png, name).await {
            Ok(url) => match self.attach_preview(board.id, &url) {
                Ok(()) => board.preview_url = Some(url),
                Err(err) => warn!("catalog: failed to record preview for {}: {}", board.id, err),
            },
            Err(err) => warn!("catalog: preview upload failed for {}: {}", board.id, err),
        }
        Ok(board)
    }

    fn read(&self, id: Uuid) -> EngineResult<SavedBoard> {
        let value = self
            .store
            .get(&board_key(id))
            .map_err(store_error)?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        serde_json::from_str(&value)
            .map_err(|e| EngineError::Parse(format!("corrupt catalog record {}: {}", id, e)))
    }

    fn write(&self, board: &SavedBoard) -> EngineResult<()> {
        let value = serde_json::to_string(board)
            .map_err(|e| EngineError::Parse(format!("failed to encode board record: {}", e)))?;
        self.store
            .set(&board_key(board.id), &value)
            .map_err(store_error)
    }
}

fn board_key(id: Uuid) -> String {
    format!("{}{}", BOARD_KEY_PREFIX, id)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Write failures surface as quota errors so the caller can tell the user
/// to clear space; everything else is validation-grade.
fn store_error(err: StoreError) -> EngineError {
    match err {
        StoreError::Quota(msg) => EngineError::Quota(msg),
        StoreError::Io(msg) | StoreError::Other(msg) => EngineError::Quota(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, DrawAction};
    use crate::color::Rgba;
    use crate::storage::MemoryStore;
    use kurbo::Point;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    fn sample_snapshot() -> BoardSnapshot {
        let mut action = DrawAction::new(ActionKind::Rect, Point::ZERO, Rgba::INK, 2);
        action.points.push(Point::new(10.0, 10.0));
        BoardSnapshot::from_actions(vec![action])
    }

    struct FixedHost {
        url: Option<String>,
    }

    impl ImageHost for FixedHost {
        fn upload(&self, _png: &[u8], _name: &str) -> BoxFuture<'_, EngineResult<String>> {
            let url = self.url.clone();
            Box::pin(async move {
                url.ok_or_else(|| EngineError::Network("host unreachable".to_string()))
            })
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let catalog = BoardCatalog::new(Box::new(MemoryStore::new()));
        let snapshot = sample_snapshot();

        let board = catalog.save("Circuit sketch", &snapshot).unwrap();
        let loaded = catalog.load(board.id).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_unknown_id() {
        let catalog = BoardCatalog::new(Box::new(MemoryStore::new()));
        let result = catalog.load(Uuid::new_v4());
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[test]
    fn test_list_newest_first() {
        let store = MemoryStore::new();
        // Write records directly so the timestamps are under control.
        for (name, created_at) in [("old", 100u64), ("new", 300), ("mid", 200)] {
            let board = SavedBoard {
                id: Uuid::new_v4(),
                name: name.to_string(),
                created_at,
                data: BoardSnapshot::new(),
                preview_url: None,
            };
            store
                .set(&board_key(board.id), &serde_json::to_string(&board).unwrap())
                .unwrap();
        }

        let catalog = BoardCatalog::new(Box::new(store));
        let names: Vec<String> = catalog.list().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_list_skips_corrupt_and_foreign_records() {
        let store = MemoryStore::new();
        store.set("board-not-a-record", "{{{").unwrap();
        store.set("settings", "dark-mode").unwrap();

        let catalog = BoardCatalog::new(Box::new(store));
        let board = catalog.save("ok", &BoardSnapshot::new()).unwrap();

        let listed = catalog.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, board.id);
    }

    #[test]
    fn test_delete() {
        let catalog = BoardCatalog::new(Box::new(MemoryStore::new()));
        let board = catalog.save("gone soon", &BoardSnapshot::new()).unwrap();

        catalog.delete(board.id).unwrap();
        assert!(catalog.list().unwrap().is_empty());
        // Deleting again is a no-op.
        catalog.delete(board.id).unwrap();
    }

    #[test]
    fn test_quota_exceeded_leaves_no_partial_entry() {
        let catalog = BoardCatalog::new(Box::new(MemoryStore::with_capacity(16)));
        let result = catalog.save("too big", &sample_snapshot());

        assert!(matches!(result, Err(EngineError::Quota(_))));
        assert!(catalog.list().unwrap().is_empty());
    }

    #[test]
    fn test_attach_preview_persists() {
        let catalog = BoardCatalog::new(Box::new(MemoryStore::new()));
        let board = catalog.save("with preview", &BoardSnapshot::new()).unwrap();

        catalog.attach_preview(board.id, "https://img.example/p.png").unwrap();

        let listed = catalog.list().unwrap();
        assert_eq!(listed[0].preview_url.as_deref(), Some("https://img.example/p.png"));
    }

    #[test]
    fn test_save_with_preview_attaches_url() {
        let catalog = BoardCatalog::new(Box::new(MemoryStore::new()));
        let host = FixedHost {
            url: Some("https://img.example/board.png".to_string()),
        };

        let board = block_on(catalog.save_with_preview(
            "uploaded",
            &BoardSnapshot::new(),
            b"\x89PNG",
            &host,
        ))
        .unwrap();

        assert_eq!(board.preview_url.as_deref(), Some("https://img.example/board.png"));
        let listed = catalog.list().unwrap();
        assert_eq!(listed[0].preview_url, board.preview_url);
    }

    #[test]
    fn test_save_with_preview_survives_upload_failure() {
        let catalog = BoardCatalog::new(Box::new(MemoryStore::new()));
        let host = FixedHost { url: None };

        let board = block_on(catalog.save_with_preview(
            "offline",
            &BoardSnapshot::new(),
            b"\x89PNG",
            &host,
        ))
        .unwrap();

        // The board was still persisted, just without a preview.
        assert!(board.preview_url.is_none());
        assert_eq!(catalog.list().unwrap().len(), 1);
    }

    #[test]
    fn test_record_wire_shape() {
        let board = SavedBoard {
            id: Uuid::nil(),
            name: "Wire".to_string(),
            created_at: 1700000000000,
            data: BoardSnapshot::new(),
            preview_url: Some("https://img.example/w.png".to_string()),
        };
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains("\"createdAt\":1700000000000"));
        assert!(json.contains("\"previewURL\""));
        assert!(json.contains("\"data\":[]"));
    }
}
