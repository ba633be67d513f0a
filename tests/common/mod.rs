#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use clouder::{
    config::Settings,
    error::{AuthError, ProviderError, StoreError},
    spotify::{ProviderClient, auth::AuthProvider},
    store::{DataStore, Query, Record},
    types::TokenResponse,
};
use serde_json::{Value, json};

/// One provider mutation, identified by the playlist it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(String),
    Remove(String),
}

pub fn add(playlist: &str) -> Call {
    Call::Add(playlist.to_string())
}

pub fn remove(playlist: &str) -> Call {
    Call::Remove(playlist.to_string())
}

/// Provider that records every call and optionally fails one of them.
#[derive(Default)]
pub struct RecordingProvider {
    calls: Mutex<Vec<Call>>,
    failure: Option<(Call, ProviderError)>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call: Call, error: ProviderError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some((call, error)),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(call.clone());
        match &self.failure {
            Some((failing, error)) if *failing == call => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ProviderClient for RecordingProvider {
    async fn add_track(
        &self,
        _token: &str,
        _track_id: &str,
        playlist_id: &str,
    ) -> Result<(), ProviderError> {
        self.record(add(playlist_id))
    }

    async fn remove_track(
        &self,
        _token: &str,
        _track_id: &str,
        playlist_id: &str,
    ) -> Result<(), ProviderError> {
        self.record(remove(playlist_id))
    }
}

/// In-memory store that counts queries.
#[derive(Default)]
pub struct CountingStore {
    collections: Mutex<HashMap<String, Vec<Record>>>,
    queries: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, collection: &str, documents: Value) -> Self {
        let records = match documents {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => record,
                    other => panic!("not an object: {other}"),
                })
                .collect(),
            other => panic!("not an array: {other}"),
        };
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), records);
        self
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataStore for CountingStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| query.matches(record))
                    .cloned()
                    .map(|record| query.project(record))
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Auth provider answering with a fixed token.
pub struct FakeAuth;

pub fn fake_token() -> TokenResponse {
    TokenResponse {
        access_token: "access-123".into(),
        token_type: "Bearer".into(),
        scope: "playlist-modify-private".into(),
        expires_in: 3600,
        refresh_token: Some("refresh-456".into()),
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    fn authorize_url(&self) -> String {
        "https://accounts.example/authorize?client_id=id&response_type=code".into()
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AuthError> {
        if code == "bad" {
            return Err(AuthError::Upstream {
                status: 400,
                body: "Failed to retrieve token from Spotify: invalid_grant".into(),
            });
        }
        Ok(fake_token())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        Ok(TokenResponse {
            refresh_token: Some(refresh_token.to_string()),
            ..fake_token()
        })
    }
}

pub fn settings() -> Settings {
    settings_with(&[])
}

pub fn settings_with(overrides: &[(&str, &str)]) -> Settings {
    let mut values: HashMap<String, String> = HashMap::from([
        ("SPOTIFY_CLIENT_ID".to_string(), "client-id".to_string()),
        ("SPOTIFY_CLIENT_SECRET".to_string(), "client-secret".to_string()),
        ("FRONTEND_URL".to_string(), "http://front.test".to_string()),
    ]);
    for (key, value) in overrides {
        values.insert(key.to_string(), value.to_string());
    }
    Settings::from_lookup(|key| values.get(key).cloned()).unwrap()
}

pub fn weeks() -> Value {
    json!([
        {"_id": "a1", "week_id": "2025-W14", "start_date": "2025-03-29", "end_date": "2025-04-04"},
        {"_id": "a2", "week_id": "2025-W15", "start_date": "2025-04-05", "end_date": "2025-04-11"}
    ])
}

pub fn playlists() -> Value {
    json!([
        {
            "_id": "p1",
            "playlist_id": "PL1",
            "playlist_name": "W14 Techno",
            "week_id": "2025-W14",
            "curated_name": "Techno",
            "curated_type": "genre",
            "followers": 12
        },
        {
            "_id": "p2",
            "playlist_id": "PL2",
            "playlist_name": "W14 Trash",
            "week_id": "2025-W14",
            "curated_name": "Trash",
            "curated_type": "trash"
        },
        {
            "_id": "p3",
            "playlist_id": "PL3",
            "playlist_name": "W15 House",
            "week_id": "2025-W15",
            "curated_name": "House",
            "curated_type": "genre"
        }
    ])
}
