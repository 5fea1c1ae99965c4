use crate::{options::ViewStateCmd, print_json};
use anyhow::{anyhow, Result};
use log::info;
use resorts::{ViewState, ViewStateStore};

impl ViewStateCmd {
    pub fn run<S: ViewStateStore>(&self, store: &S) -> Result<()> {
        match self {
            Self::Get(get) => {
                let state = store
                    .get(&get.resort)?
                    .ok_or_else(|| anyhow!("no saved view state for '{}'", get.resort))?;
                print_json(&state)
            }
            Self::Set(set) => {
                let state = ViewState {
                    latitude: set.latitude,
                    longitude: set.longitude,
                    zoom: set.zoom,
                    bearing: set.bearing,
                    pitch: set.pitch,
                };
                store.set(&set.resort, state)?;
                info!("saved view state for {}", set.resort);
                Ok(())
            }
        }
    }
}
