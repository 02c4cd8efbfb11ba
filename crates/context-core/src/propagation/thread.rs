use super::context::CapturedContext;
use std::io;
use std::thread::{self, JoinHandle};

/// Capture the calling thread's context into a closure.
///
/// When no context is active the closure runs exactly as given.
pub fn propagate<F, R>(f: F) -> impl FnOnce() -> R + Send + 'static
where
    F: FnOnce() -> R + Send + 'static,
    R: 'static,
{
    let context = CapturedContext::capture();
    move || {
        if context.is_empty() {
            return f();
        }
        let _guard = context.transmit();
        f()
    }
}

/// `std::thread::spawn` carrying the caller's trace context into the new thread
pub fn spawn<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::spawn(propagate(f))
}

/// Named variant of [`spawn`]
pub fn spawn_named<F, T>(name: impl Into<String>, f: F) -> io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new().name(name.into()).spawn(propagate(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SessionId;
    use crate::trace;

    #[test]
    fn test_spawn_carries_context() {
        trace::set(SessionId::from("REWIND-s-1"));
        let seen = spawn(trace::get).join().unwrap();
        trace::remove();
        assert_eq!(seen, Some(SessionId::from("REWIND-s-1")));
    }

    #[test]
    fn test_spawn_without_context() {
        let seen = spawn_named("untraced", || (trace::get(), thread::current().name().map(String::from)))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(seen, (None, Some("untraced".to_string())));
    }

    #[test]
    fn test_propagated_closure_restores_caller_slot() {
        trace::set(SessionId::from("REWIND-s-2"));
        let job = propagate(trace::get);
        trace::set(SessionId::from("REWIND-s-3"));

        assert_eq!(job(), Some(SessionId::from("REWIND-s-2")));
        assert_eq!(trace::remove(), Some(SessionId::from("REWIND-s-3")));
    }
}
