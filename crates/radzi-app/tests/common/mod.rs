#![allow(dead_code)]

use radzi_app::{AppCore, AppEffects};
use radzi_core::effects::TimeEffects;
use radzi_core::types::{Club, ClubId};
use radzi_core::RadziConfig;
use radzi_testkit::{FaultyStorage, RecordingNavigator, ScriptedApi, ScriptedAuth};
use std::sync::Arc;

pub struct Harness {
    pub app: AppCore,
    pub storage: FaultyStorage,
    pub api: ScriptedApi,
    pub navigator: RecordingNavigator,
}

impl Harness {
    pub fn new(time: Arc<dyn TimeEffects>, auth: ScriptedAuth) -> Self {
        Self::with_storage(time, auth, FaultyStorage::new())
    }

    pub fn with_storage(time: Arc<dyn TimeEffects>, auth: ScriptedAuth, storage: FaultyStorage) -> Self {
        let api = ScriptedApi::new();
        let navigator = RecordingNavigator::new();
        let effects = AppEffects {
            storage: Arc::new(storage.clone()),
            time,
            api: Arc::new(api.clone()),
            auth: Arc::new(auth),
            navigation: Arc::new(navigator.clone()),
        };
        let app = AppCore::new(RadziConfig::default(), effects, true).unwrap();
        Self {
            app,
            storage,
            api,
            navigator,
        }
    }
}

pub fn club(id: u64, name: &str) -> Club {
    Club {
        id: ClubId(id),
        name: name.to_string(),
        share_code: None,
    }
}
