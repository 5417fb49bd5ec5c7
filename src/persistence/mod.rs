//! Best-distance persistence
//!
//! A single scalar survives between sessions: the longest run so far.
//! In the browser it lives in LocalStorage; tests and native builds use an
//! in-memory store.

/// LocalStorage key for the best distance
pub const RECORD_KEY: &str = "endlessRacerRecord";

/// Key-value backend for the best distance
pub trait RecordStore {
    /// Stored best distance, if there is a readable one
    fn load_best_distance(&self) -> Option<f32>;
    fn save_best_distance(&mut self, distance: f32);
}

/// Format used for the stored value
pub fn format_record(distance: f32) -> String {
    format!("{distance:.2}")
}

/// Parse a stored value. Unreadable, negative or non-finite values count as
/// no record.
pub fn parse_record(raw: &str) -> Option<f32> {
    match raw.trim().parse::<f32>() {
        Ok(d) if d.is_finite() && d >= 0.0 => Some(d),
        Ok(_) | Err(_) => {
            log::warn!("Ignoring unreadable record {:?}", raw);
            None
        }
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a raw value
    pub fn with_raw(raw: &str) -> Self {
        Self {
            value: Some(raw.to_string()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl RecordStore for MemoryStore {
    fn load_best_distance(&self) -> Option<f32> {
        self.value.as_deref().and_then(parse_record)
    }

    fn save_best_distance(&mut self, distance: f32) {
        self.value = Some(format_record(distance));
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl RecordStore for LocalStorageStore {
    fn load_best_distance(&self) -> Option<f32> {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, record will not persist");
            return None;
        };
        match storage.get_item(RECORD_KEY) {
            Ok(Some(raw)) => parse_record(&raw),
            _ => None,
        }
    }

    fn save_best_distance(&mut self, distance: f32) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if storage
            .set_item(RECORD_KEY, &format_record(distance))
            .is_err()
        {
            log::warn!("Failed to save record");
        }
    }
}

/// The best distance, read once at startup and written when beaten
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BestRecord {
    best: f32,
}

impl BestRecord {
    pub fn load(store: &impl RecordStore) -> Self {
        let best = store.load_best_distance().unwrap_or(0.0);
        log::info!("Best distance: {:.2} km", best);
        Self { best }
    }

    pub fn best(&self) -> f32 {
        self.best
    }

    /// Persist `distance` if it beats the record. Returns whether it did.
    pub fn submit(&mut self, distance: f32, store: &mut impl RecordStore) -> bool {
        if distance > self.best {
            self.best = distance;
            store.save_best_distance(distance);
            log::info!("New record: {:.2} km", distance);
            true
        } else {
            false
        }
    }
}
