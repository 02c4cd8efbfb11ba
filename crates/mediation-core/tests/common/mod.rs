// Store doubles and a fake data-access client for mediation tests

#![allow(dead_code)]

use anyhow::bail;
use parking_lot::Mutex;
use rewind_context_core::{ContextManager, IdGenerator};
use rewind_mediation_core::{
    Call, CallDescriptor, CallMediator, DescriptorKey, IgnoreList, MockCategory, Outcome, RecordSink,
    ReplayLookup,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Recording store keyed the way replay looks calls up
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<DescriptorKey, Outcome>>,
    recorded: Mutex<Vec<CallDescriptor>>,
    pub fail_lookups: AtomicBool,
    pub fail_records: AtomicBool,
}

impl InMemoryStore {
    pub fn recorded(&self) -> Vec<CallDescriptor> {
        self.recorded.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl ReplayLookup for InMemoryStore {
    fn lookup(&self, descriptor: &CallDescriptor) -> anyhow::Result<Option<Outcome>> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            bail!("replay store unavailable");
        }
        Ok(self.entries.lock().get(&descriptor.key()).cloned())
    }
}

impl RecordSink for InMemoryStore {
    fn record(&self, descriptor: CallDescriptor) -> anyhow::Result<()> {
        if self.fail_records.load(Ordering::SeqCst) {
            bail!("record store unavailable");
        }
        if let Some(response) = descriptor.response.clone() {
            self.entries.lock().insert(descriptor.key(), response);
        }
        self.recorded.lock().push(descriptor);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DalError {
    Timeout,
    Rejected(String),
}

/// Data-access client instrumented the way a call site would be
pub struct DalClient {
    mediator: Arc<CallMediator>,
    executed: AtomicUsize,
    pub fail_next: AtomicBool,
}

impl DalClient {
    pub fn new(mediator: Arc<CallMediator>) -> Self {
        Self {
            mediator,
            executed: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    pub fn query(&self, sql: &str) -> Result<Vec<Row>, DalError> {
        self.mediator
            .mediate_json(MockCategory::Database, "query", sql, || self.execute(sql))
    }

    /// Batch lookup keyed by (shard, slot); such maps have no JSON encoding
    pub fn lookup_slots(&self, slots: &HashMap<(u8, u8), u8>) -> Result<Vec<Row>, DalError> {
        self.mediator.mediate_json(MockCategory::Database, "lookup_slots", slots, || {
            self.execute(&format!("{} slots", slots.len()))
        })
    }

    /// Same as `query` through the explicit before/after hooks
    pub fn query_with_hooks(&self, sql: &str) -> Result<Vec<Row>, DalError> {
        let call = Call::json(MockCategory::Database, "query", sql).expect("sql encodes");
        if let Some(mock) = self.mediator.before(&call) {
            if mock.should_short_circuit() {
                let outcome = mock.into_outcome().expect("short circuit has an outcome");
                return outcome.decode().expect("recorded rows decode");
            }
        }
        let result = self.execute(sql);
        let outcome = Outcome::from_result(&result).expect("rows encode");
        self.mediator.after(&call, outcome);
        result
    }

    /// Number of queries that reached the database
    pub fn executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }

    fn execute(&self, sql: &str) -> Result<Vec<Row>, DalError> {
        let run = self.executed.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DalError::Rejected(sql.to_string()));
        }
        Ok(vec![Row {
            id: run as u64,
            name: format!("row for {}", sql),
        }])
    }
}

pub struct Harness {
    pub contexts: Arc<ContextManager>,
    pub store: Arc<InMemoryStore>,
    pub client: DalClient,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_ignore(IgnoreList::default())
    }

    pub fn with_ignore(ignore: IgnoreList) -> Self {
        let contexts = Arc::new(ContextManager::new(Arc::new(IdGenerator::with_host_tag(
            "10.0.0.1",
        ))));
        let store = Arc::new(InMemoryStore::default());
        let mediator = CallMediator::new(contexts.clone(), store.clone(), store.clone())
            .with_ignore_list(ignore);
        Self {
            contexts,
            store,
            client: DalClient::new(Arc::new(mediator)),
        }
    }

    /// Run `work` inside a recording session and return the session's id
    pub fn recording<R>(&self, work: impl FnOnce(&DalClient) -> R) -> (String, R) {
        let session = self
            .contexts
            .resolve_or_create(true, None)
            .expect("generator configured")
            .expect("fresh session");
        let result = work(&self.client);
        self.contexts.end();
        (session.id().to_string(), result)
    }

    /// Run `work` inside a session replaying `record_id`
    pub fn replaying<R>(&self, record_id: &str, work: impl FnOnce(&DalClient) -> R) -> R {
        self.contexts
            .resolve_or_create(true, Some(record_id))
            .expect("generator configured")
            .expect("fresh session");
        let result = work(&self.client);
        self.contexts.end();
        result
    }
}
