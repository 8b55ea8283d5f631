//! In-memory stand-ins for every collaborator of the lifecycle engine.
//!
//! Each fake is cheaply cloneable and shares its state, so a test can hand
//! one clone to the controller and keep another to inspect afterwards.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use ssm_run::command::{CommandHandle, CommandRequest, StatusSnapshot};
use ssm_run::dispatch::CommandDispatch;
use ssm_run::dispatch::status::resolve_exit_code;
use ssm_run::errors::{Result, SsmRunError};
use ssm_run::handoff::HandoffStore;
use ssm_run::logstore::LogStore;
use ssm_run::report::Reporter;
use ssm_run::types::BoxFuture;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct DispatchState {
    command_id: String,
    submit_error: Option<String>,
    statuses: VecDeque<StatusSnapshot>,
    last_status: Option<StatusSnapshot>,
    poll_error_at: Option<(usize, String)>,
    requery: Option<StatusSnapshot>,
    cancel_error: Option<String>,

    submitted: Vec<CommandRequest>,
    polls: usize,
    requeries: usize,
    cancelled: Vec<CommandHandle>,
}

/// Scripted `CommandDispatch`.
///
/// Status queries return the scripted snapshots in order; once they run out
/// the last one is repeated.
#[derive(Debug, Clone, Default)]
pub struct FakeDispatch {
    state: Arc<Mutex<DispatchState>>,
}

impl FakeDispatch {
    pub fn new(command_id: &str) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().command_id = command_id.to_string();
        fake
    }

    pub fn with_statuses(self, statuses: Vec<StatusSnapshot>) -> Self {
        self.state.lock().unwrap().statuses = statuses.into();
        self
    }

    pub fn failing_submit(self, message: &str) -> Self {
        self.state.lock().unwrap().submit_error = Some(message.to_string());
        self
    }

    /// Fail the `n`th status query (1-based).
    pub fn failing_poll_at(self, n: usize, message: &str) -> Self {
        self.state.lock().unwrap().poll_error_at = Some((n, message.to_string()));
        self
    }

    /// Behave like the listing backend: re-query once after the terminal
    /// status and use this snapshot's code when it has one.
    pub fn with_requery(self, snapshot: StatusSnapshot) -> Self {
        self.state.lock().unwrap().requery = Some(snapshot);
        self
    }

    pub fn failing_cancel(self, message: &str) -> Self {
        self.state.lock().unwrap().cancel_error = Some(message.to_string());
        self
    }

    pub fn submitted(&self) -> Vec<CommandRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn poll_count(&self) -> usize {
        self.state.lock().unwrap().polls
    }

    pub fn requery_count(&self) -> usize {
        self.state.lock().unwrap().requeries
    }

    pub fn cancelled(&self) -> Vec<CommandHandle> {
        self.state.lock().unwrap().cancelled.clone()
    }
}

impl CommandDispatch for FakeDispatch {
    fn submit<'a>(&'a self, request: &'a CommandRequest) -> BoxFuture<'a, Result<CommandHandle>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if let Some(ref message) = state.submit_error {
                return Err(SsmRunError::Dispatch(message.clone()));
            }
            state.submitted.push(request.clone());
            Ok(CommandHandle::new(state.command_id.clone(), &request.target_id))
        })
    }

    fn poll_status<'a>(&'a self, _handle: &'a CommandHandle) -> BoxFuture<'a, Result<StatusSnapshot>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.polls += 1;

            if let Some((n, ref message)) = state.poll_error_at {
                if n == state.polls {
                    return Err(SsmRunError::PollQuery(message.clone()));
                }
            }

            let next = match state.statuses.pop_front() {
                Some(snapshot) => snapshot,
                None => state
                    .last_status
                    .clone()
                    .expect("FakeDispatch polled without any scripted status"),
            };
            state.last_status = Some(next.clone());
            Ok(next)
        })
    }

    fn resolve_exit_code<'a>(
        &'a self,
        _handle: &'a CommandHandle,
        terminal: &'a StatusSnapshot,
    ) -> BoxFuture<'a, Result<i32>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            match state.requery.clone() {
                Some(requery) => {
                    state.requeries += 1;
                    Ok(resolve_exit_code(terminal, Some(&requery)))
                }
                None => Ok(resolve_exit_code(terminal, None)),
            }
        })
    }

    fn cancel<'a>(&'a self, handle: &'a CommandHandle) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.cancelled.push(handle.clone());
            match state.cancel_error {
                Some(ref message) => Err(SsmRunError::Cancel(message.clone())),
                None => Ok(()),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Log store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum StoredObject {
    Text(String),
    Broken(String),
}

/// `LogStore` over a map of `(bucket, key)` to content.
#[derive(Debug, Clone, Default)]
pub struct FakeLogStore {
    objects: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl FakeLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, bucket: &str, key: &str, text: &str) -> Self {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject::Text(text.to_string()),
        );
        self
    }

    /// Reads of this object fail with something other than "not found".
    pub fn with_broken_object(self, bucket: &str, key: &str, message: &str) -> Self {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject::Broken(message.to_string()),
        );
        self
    }

    /// Keys requested so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl LogStore for FakeLogStore {
    fn fetch_text<'a>(&'a self, bucket: &'a str, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            self.fetched.lock().unwrap().push(key.to_string());
            let objects = self.objects.lock().unwrap();
            match objects.get(&(bucket.to_string(), key.to_string())) {
                Some(StoredObject::Text(text)) => Ok(Some(text.clone())),
                Some(StoredObject::Broken(message)) => Err(SsmRunError::LogFetch {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    message: message.clone(),
                }),
                None => Ok(None),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Handoff
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct HandoffState {
    slot: Option<String>,
    saves: usize,
    fail_saves: bool,
    fail_loads: bool,
}

/// Handoff slot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHandoff {
    state: Arc<Mutex<HandoffState>>,
}

impl MemoryHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(self, command_id: &str) -> Self {
        self.state.lock().unwrap().slot = Some(command_id.to_string());
        self
    }

    pub fn failing_save(self) -> Self {
        self.state.lock().unwrap().fail_saves = true;
        self
    }

    pub fn failing_load(self) -> Self {
        self.state.lock().unwrap().fail_loads = true;
        self
    }

    pub fn slot(&self) -> Option<String> {
        self.state.lock().unwrap().slot.clone()
    }

    pub fn save_count(&self) -> usize {
        self.state.lock().unwrap().saves
    }
}

impl HandoffStore for MemoryHandoff {
    fn save(&self, command_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_saves {
            return Err(SsmRunError::Handoff("slot is read-only".to_string()));
        }
        state.saves += 1;
        state.slot = Some(command_id.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if state.fail_loads {
            return Err(SsmRunError::Handoff("slot is unreadable".to_string()));
        }
        Ok(state.slot.clone())
    }
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Info(String),
    Warning(String),
    Error(String),
    GroupStart(String),
    GroupEnd,
    Output(String, String),
}

/// `Reporter` that records everything it is told.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.collect(|e| match e {
            ReportEvent::Info(m) => Some(m.clone()),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.collect(|e| match e {
            ReportEvent::Warning(m) => Some(m.clone()),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.collect(|e| match e {
            ReportEvent::Error(m) => Some(m.clone()),
            _ => None,
        })
    }

    pub fn output(&self, name: &str) -> Option<String> {
        self.collect(|e| match e {
            ReportEvent::Output(n, v) if n == name => Some(v.clone()),
            _ => None,
        })
        .pop()
    }

    /// Events recorded between `GroupStart(name)` and the next `GroupEnd`.
    pub fn group(&self, name: &str) -> Vec<ReportEvent> {
        let events = self.events();
        let mut inside = false;
        let mut out = Vec::new();
        for event in events {
            match event {
                ReportEvent::GroupStart(ref n) if n == name => inside = true,
                ReportEvent::GroupEnd if inside => inside = false,
                other if inside => out.push(other),
                _ => {}
            }
        }
        out
    }

    fn collect(&self, f: impl Fn(&ReportEvent) -> Option<String>) -> Vec<String> {
        self.events.lock().unwrap().iter().filter_map(f).collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(ReportEvent::Info(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(ReportEvent::Warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(ReportEvent::Error(message.to_string()));
    }

    fn start_group(&self, name: &str) {
        self.push(ReportEvent::GroupStart(name.to_string()));
    }

    fn end_group(&self) {
        self.push(ReportEvent::GroupEnd);
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.push(ReportEvent::Output(name.to_string(), value.to_string()));
        Ok(())
    }
}
