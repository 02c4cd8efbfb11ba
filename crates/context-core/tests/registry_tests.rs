//! Session lifecycle on the process-wide manager

mod common;

use common::WorkerPool;
use parking_lot::Mutex;
use rewind_context_core::propagation::{task_fn, Executor, PropagatingExecutor};
use rewind_context_core::{
    trace, ContextListener, ContextManager, IdGenerator, Session, SessionId, SessionMode,
};
use serial_test::serial;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

#[derive(Default)]
struct Journal {
    events: Mutex<Vec<String>>,
}

impl ContextListener for Journal {
    fn on_create(&self, session: &Arc<Session>) {
        self.events.lock().push(format!("create:{}", session.id()));
    }

    fn on_complete(&self, session: Option<&Arc<Session>>) {
        let entry = match session {
            Some(session) => format!("complete:{}", session.id()),
            None => "complete:none".to_string(),
        };
        self.events.lock().push(entry);
    }
}

#[test]
#[serial]
fn test_record_session_end_to_end_on_global_manager() {
    IdGenerator::global().configure("10-0-0-1");
    let contexts = ContextManager::global();
    let journal = Arc::new(Journal::default());
    contexts.register_listener(journal.clone());

    let session = contexts
        .resolve_or_create(true, None)
        .unwrap()
        .expect("entrance opens a session");
    let id = session.id().clone();
    assert!(id.as_str().starts_with("REWIND-10-0-0-1-"));
    assert_eq!(session.mode(), SessionMode::Record);
    assert!(contexts.is_recording());
    assert!(!contexts.is_replaying());

    let pool = PropagatingExecutor::new(WorkerPool::new(1, 4));
    let (tx, rx) = mpsc::channel();
    pool.execute(task_fn(move || {
        let _ = tx.send(trace::get());
    }))
    .unwrap();
    assert_eq!(rx.recv().unwrap(), Some(id.clone()));
    assert_eq!(pool.inner().observe(trace::get), None);
    pool.into_inner().shutdown();

    let ended = contexts.end().expect("session was registered");
    assert_eq!(ended.id(), &id);
    assert!(contexts.lookup(&id).is_none());
    assert!(!contexts.is_active());

    let events = journal.events.lock().clone();
    let own: Vec<_> = events
        .into_iter()
        .filter(|event| event.ends_with(id.as_str()))
        .collect();
    assert_eq!(own, vec![format!("create:{}", id), format!("complete:{}", id)]);
}

#[test]
#[serial]
fn test_replay_session_visible_from_other_threads() {
    IdGenerator::global().configure("10-0-0-1");
    let contexts = ContextManager::global();

    let session = contexts
        .resolve_or_create(true, Some("REWIND-10-0-0-1-17000000000000"))
        .unwrap()
        .unwrap();
    assert!(contexts.is_replaying());
    assert_eq!(session.record_id(), "REWIND-10-0-0-1-17000000000000");

    let id = session.id().clone();
    let lookup_id = id.clone();
    let remote = ContextManager::global();
    let seen = thread::spawn(move || {
        // Other threads see the entry but have no context of their own
        let found = remote.lookup(&lookup_id).map(|s| s.mode());
        (found, remote.is_active())
    })
    .join()
    .unwrap();
    assert_eq!(seen, (Some(SessionMode::Replay), false));

    contexts.end();
    assert!(contexts.lookup(&id).is_none());
}

#[test]
#[serial]
fn test_reconfigure_keeps_ids_unique() {
    let generator = IdGenerator::global();
    generator.configure("10-0-0-1");
    let before = generator.next().unwrap();
    generator.configure("10.0.0.1");
    let after = generator.next().unwrap();

    assert_ne!(before, after);
    assert!(after.as_str().starts_with("REWIND-10-0-0-1-"));
}

#[test]
#[serial]
fn test_stale_id_without_session_is_not_healed() {
    IdGenerator::global().configure("10-0-0-1");
    let contexts = ContextManager::global();

    trace::set(SessionId::from("REWIND-10-0-0-1-stale"));
    assert!(contexts.resolve_or_create(true, None).unwrap().is_none());
    assert!(!contexts.is_recording());
    assert!(contexts.end().is_none());
    assert_eq!(trace::get(), None);
}
