#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use user_sync::contract::model::{BackendUser, NewBackendUser, TokenClaims};
use user_sync::domain::create::CreateHandler;
use user_sync::domain::delete::DeleteHandler;
use user_sync::domain::error::SyncError;
use user_sync::domain::ports::{ClaimsPort, MarkerStore, UserDirectory};

/// Every outbound call the handlers make, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InsertUser(NewBackendUser),
    FindUserId(String),
    DeleteTodos(String),
    DeleteUser(String),
    SetClaims(String, TokenClaims),
    CreateMarker(String),
    DeleteMarker(String),
}

/// How the fake backend should misbehave.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
    pub insert_returns_no_row: bool,
    pub insert_graphql_error: bool,
    pub backend_unavailable: bool,
    pub reject_claims: bool,
    pub marker_store_down: bool,
    /// `delete_user` reports zero affected rows and leaves the row alone.
    pub user_row_vanished: bool,
}

#[derive(Default)]
struct State {
    next_id: u64,
    users: Vec<BackendUser>,
    todos: Vec<(String, String)>,
    markers: HashSet<String>,
    claims: Vec<(String, TokenClaims)>,
}

/// In-memory stand-in for the backend store, the claims API and the marker
/// store at once, recording each call.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    state: Mutex<State>,
    faults: Mutex<Faults>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_faults(faults: Faults) -> Arc<Self> {
        let fake = Self::default();
        *fake.faults.lock() = faults;
        Arc::new(fake)
    }

    pub fn set_faults(&self, faults: Faults) {
        *self.faults.lock() = faults;
    }

    /// Seed a user row (and optional todos) without recording a call.
    pub fn seed_user(&self, id: &str, firebase_uid: &str, todos: usize) {
        let mut state = self.state.lock();
        state.users.push(BackendUser {
            id: id.to_string(),
            firebase_uid: firebase_uid.to_string(),
            name: "seeded".to_string(),
            email: None,
            created_at: Some(Utc::now()),
        });
        for n in 0..todos {
            state.todos.push((format!("todo-{n}"), id.to_string()));
        }
    }

    pub fn seed_marker(&self, key: &str) {
        self.state.lock().markers.insert(key.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn has_marker(&self, key: &str) -> bool {
        self.state.lock().markers.contains(key)
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().users.len()
    }

    pub fn todo_count(&self) -> usize {
        self.state.lock().todos.len()
    }

    pub fn claims_for(&self, external_id: &str) -> Option<TokenClaims> {
        self.state
            .lock()
            .claims
            .iter()
            .rev()
            .find(|(uid, _)| uid == external_id)
            .map(|(_, c)| c.clone())
    }

    pub fn create_handler(self: &Arc<Self>) -> CreateHandler {
        CreateHandler::new(self.clone(), self.clone(), self.clone())
    }

    pub fn delete_handler(self: &Arc<Self>) -> DeleteHandler {
        DeleteHandler::new(self.clone(), self.clone())
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn faults(&self) -> Faults {
        *self.faults.lock()
    }

    fn check_backend(&self) -> Result<(), SyncError> {
        if self.faults().backend_unavailable {
            return Err(SyncError::backend_unavailable("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for FakeBackend {
    async fn insert_user(
        &self,
        new_user: &NewBackendUser,
    ) -> Result<Option<BackendUser>, SyncError> {
        self.record(Call::InsertUser(new_user.clone()));
        self.check_backend()?;
        let faults = self.faults();
        if faults.insert_graphql_error {
            return Err(SyncError::backend_graphql(vec![
                "Uniqueness violation".to_string()
            ]));
        }
        if faults.insert_returns_no_row {
            return Ok(None);
        }

        let mut state = self.state.lock();
        state.next_id += 1;
        let user = BackendUser {
            id: format!("u{}", state.next_id),
            firebase_uid: new_user.firebase_uid.clone(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            created_at: Some(Utc::now()),
        };
        state.users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_user_id(&self, firebase_uid: &str) -> Result<Option<String>, SyncError> {
        self.record(Call::FindUserId(firebase_uid.to_string()));
        self.check_backend()?;
        Ok(self
            .state
            .lock()
            .users
            .iter()
            .find(|u| u.firebase_uid == firebase_uid)
            .map(|u| u.id.clone()))
    }

    async fn delete_todos(&self, user_id: &str) -> Result<u64, SyncError> {
        self.record(Call::DeleteTodos(user_id.to_string()));
        self.check_backend()?;
        let mut state = self.state.lock();
        let before = state.todos.len();
        state.todos.retain(|(_, owner)| owner != user_id);
        Ok((before - state.todos.len()) as u64)
    }

    async fn delete_user(&self, user_id: &str) -> Result<u64, SyncError> {
        self.record(Call::DeleteUser(user_id.to_string()));
        self.check_backend()?;
        if self.faults().user_row_vanished {
            return Ok(0);
        }
        let mut state = self.state.lock();
        if state.todos.iter().any(|(_, owner)| owner == user_id) {
            return Err(SyncError::backend_graphql(vec![
                "Foreign key violation on todos.user_id".to_string(),
            ]));
        }
        let before = state.users.len();
        state.users.retain(|u| u.id != user_id);
        Ok((before - state.users.len()) as u64)
    }
}

#[async_trait]
impl ClaimsPort for FakeBackend {
    async fn set_custom_claims(
        &self,
        external_id: &str,
        claims: &TokenClaims,
    ) -> Result<(), SyncError> {
        self.record(Call::SetClaims(external_id.to_string(), claims.clone()));
        if self.faults().reject_claims {
            return Err(SyncError::claims_assignment_failed(
                external_id,
                "USER_NOT_FOUND",
            ));
        }
        self.state
            .lock()
            .claims
            .push((external_id.to_string(), claims.clone()));
        Ok(())
    }
}

#[async_trait]
impl MarkerStore for FakeBackend {
    async fn create_marker(&self, key: &str) -> Result<(), SyncError> {
        self.record(Call::CreateMarker(key.to_string()));
        if self.faults().marker_store_down {
            return Err(SyncError::marker_store(key, "HTTP 503"));
        }
        if !self.state.lock().markers.insert(key.to_string()) {
            return Err(SyncError::duplicate_marker(key));
        }
        Ok(())
    }

    async fn delete_marker(&self, key: &str) -> Result<(), SyncError> {
        self.record(Call::DeleteMarker(key.to_string()));
        if self.faults().marker_store_down {
            return Err(SyncError::marker_store(key, "HTTP 503"));
        }
        self.state.lock().markers.remove(key);
        Ok(())
    }
}
