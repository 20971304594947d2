//! In-memory `CodeApi` double used by unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::dto::{
    BindRequest, BindResponse, CodesDocument, DeleteBindingRequest, DeleteBindingResponse,
};
use crate::errors::ApiError;
use crate::services::api_client::CodeApi;
use crate::utils::normalize_code;

/// How the double answers write calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Behave like the real server
    Honor,
    /// Answer `{ "ok": false }`
    Reject,
    /// Fail as if the server were down
    Unreachable,
}

#[derive(Debug, Default)]
struct Store {
    codes: Vec<String>,
    bindings: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct FakeCodeApi {
    store: Mutex<Store>,
    fetch_fails: AtomicBool,
    write_mode: Mutex<WriteMode>,
    fetches: AtomicUsize,
    binds: Mutex<Vec<BindRequest>>,
    deletes: Mutex<Vec<String>>,
}

impl FakeCodeApi {
    pub fn new(codes: &[&str], bindings: &[(&str, &str)]) -> Self {
        Self {
            store: Mutex::new(Store {
                codes: codes.iter().map(ToString::to_string).collect(),
                bindings: bindings
                    .iter()
                    .map(|(c, g)| ((*c).to_string(), (*g).to_string()))
                    .collect(),
            }),
            fetch_fails: AtomicBool::new(false),
            write_mode: Mutex::new(WriteMode::Honor),
            fetches: AtomicUsize::new(0),
            binds: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub fn set_fetch_fails(&self, fails: bool) {
        self.fetch_fails.store(fails, Ordering::SeqCst);
    }

    pub fn set_write_mode(&self, mode: WriteMode) {
        if let Ok(mut current) = self.write_mode.lock() {
            *current = mode;
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn bind_requests(&self) -> Vec<BindRequest> {
        self.binds.lock().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn delete_requests(&self) -> Vec<String> {
        self.deletes.lock().map(|d| d.clone()).unwrap_or_default()
    }

    pub fn insert_binding(&self, code: &str, game: &str) {
        if let Ok(mut store) = self.store.lock() {
            store.bindings.insert(code.to_string(), game.to_string());
        }
    }

    pub fn remove_code(&self, code: &str) {
        if let Ok(mut store) = self.store.lock() {
            store.codes.retain(|c| normalize_code(c) != normalize_code(code));
        }
    }

    fn mode(&self) -> WriteMode {
        self.write_mode
            .lock()
            .map(|m| *m)
            .unwrap_or(WriteMode::Honor)
    }

    fn reject(status: u16, reason: &str) -> ApiError {
        ApiError::Rejected {
            status,
            reason: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl CodeApi for FakeCodeApi {
    async fn fetch_codes(&self) -> Result<CodesDocument, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fetch_fails.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        let store = self
            .store
            .lock()
            .map_err(|_| ApiError::Transport("poisoned".to_string()))?;
        Ok(CodesDocument {
            codes: store.codes.clone(),
            bindings: store
                .bindings
                .iter()
                .map(|(c, g)| (c.clone(), g.clone()))
                .collect(),
        })
    }

    async fn bind(&self, request: &BindRequest) -> Result<BindResponse, ApiError> {
        if let Ok(mut binds) = self.binds.lock() {
            binds.push(request.clone());
        }
        match self.mode() {
            WriteMode::Reject => return Err(Self::reject(500, "save_failed")),
            WriteMode::Unreachable => {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            WriteMode::Honor => {}
        }

        let code = normalize_code(&request.code);
        let mut store = self
            .store
            .lock()
            .map_err(|_| ApiError::Transport("poisoned".to_string()))?;
        if !store.codes.iter().any(|c| normalize_code(c) == code) {
            return Err(Self::reject(400, "invalid_code"));
        }
        let game = store
            .bindings
            .entry(code.clone())
            .or_insert_with(|| request.game.clone())
            .clone();
        store.codes.retain(|c| normalize_code(c) != code);

        Ok(BindResponse {
            ok: true,
            error: None,
            code: Some(code),
            game: Some(game),
            locked: true,
        })
    }

    async fn delete_binding(
        &self,
        request: &DeleteBindingRequest,
    ) -> Result<DeleteBindingResponse, ApiError> {
        if let Ok(mut deletes) = self.deletes.lock() {
            deletes.push(request.code.clone());
        }
        match self.mode() {
            WriteMode::Reject => return Err(Self::reject(500, "save_failed")),
            WriteMode::Unreachable => {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            WriteMode::Honor => {}
        }

        let code = normalize_code(&request.code);
        let mut store = self
            .store
            .lock()
            .map_err(|_| ApiError::Transport("poisoned".to_string()))?;
        if store.bindings.remove(&code).is_none() {
            return Err(Self::reject(404, "binding_not_found"));
        }
        store.codes.push(code.clone());

        Ok(DeleteBindingResponse {
            ok: true,
            error: None,
            code: Some(code),
            message: Some("Binding deleted successfully".to_string()),
        })
    }
}
