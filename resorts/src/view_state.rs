//! Saved map camera positions, keyed by resort name.

use crate::{atomic, presets, ResortsError};
use dashmap::DashMap;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

type JsonObject = Map<String, Value>;

/// Where the map camera points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,

    /// Degrees clockwise from north.
    #[serde(default)]
    pub bearing: f64,

    /// Degrees from looking straight down.
    #[serde(default)]
    pub pitch: f64,
}

pub trait ViewStateStore {
    fn get(&self, resort: &str) -> Result<Option<ViewState>, ResortsError>;
    fn set(&self, resort: &str, state: ViewState) -> Result<(), ResortsError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemStore {
    states: DashMap<String, ViewState>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewStateStore for MemStore {
    fn get(&self, resort: &str) -> Result<Option<ViewState>, ResortsError> {
        Ok(self.states.get(resort).map(|state| *state))
    }

    fn set(&self, resort: &str, state: ViewState) -> Result<(), ResortsError> {
        self.states.insert(resort.to_owned(), state);
        Ok(())
    }
}

/// All view states in a single JSON object, `{ "<resort>": { .. } }`.
///
/// Entries are decoded one at a time, so a malformed entry only hides
/// that one resort and is carried over untouched by [`set`].
///
/// [`set`]: ViewStateStore::set
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,

    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every saved view state that decodes. A missing file has
    /// none.
    pub fn all(&self) -> Result<BTreeMap<String, ViewState>, ResortsError> {
        let states = self
            .read_object()?
            .into_iter()
            .filter_map(|(resort, value)| decode(&resort, value).map(|state| (resort, state)))
            .collect();
        Ok(states)
    }

    /// The raw JSON object, without decoding any entry.
    fn read_object(&self) -> Result<JsonObject, ResortsError> {
        match File::open(&self.path) {
            Ok(file) => Ok(serde_json::from_reader(BufReader::new(file))?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(JsonObject::new()),
            Err(e) => Err(e.into()),
        }
    }
}

fn decode(resort: &str, value: Value) -> Option<ViewState> {
    match serde_json::from_value(value) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("skipping view state for {resort}: {e}");
            None
        }
    }
}

impl ViewStateStore for JsonFileStore {
    /// A malformed entry for `resort` reads as missing.
    fn get(&self, resort: &str) -> Result<Option<ViewState>, ResortsError> {
        Ok(self
            .read_object()?
            .remove(resort)
            .and_then(|value| decode(resort, value)))
    }

    /// A file that isn't a JSON object is replaced rather than
    /// blocking every future save.
    fn set(&self, resort: &str, state: ViewState) -> Result<(), ResortsError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut states = match self.read_object() {
            Ok(states) => states,
            Err(ResortsError::Json(e)) => {
                warn!("replacing unreadable {}: {e}", self.path.display());
                JsonObject::new()
            }
            Err(e) => return Err(e),
        };
        states.insert(resort.to_owned(), serde_json::to_value(state)?);
        atomic::write_json(&self.path, &states)
    }
}

/// Answers from `store` first, then from the built-in
/// [`presets`](crate::presets).
#[derive(Debug, Default)]
pub struct Fallback<S> {
    store: S,
}

impl<S> Fallback<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ViewStateStore> ViewStateStore for Fallback<S> {
    fn get(&self, resort: &str) -> Result<Option<ViewState>, ResortsError> {
        Ok(self.store.get(resort)?.or_else(|| presets::preset(resort)))
    }

    fn set(&self, resort: &str, state: ViewState) -> Result<(), ResortsError> {
        self.store.set(resort, state)
    }
}
