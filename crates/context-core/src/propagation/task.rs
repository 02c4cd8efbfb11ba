use std::any::TypeId;
use std::fmt;

/// A unit of deferred work accepted by executors.
///
/// Besides running, a task answers the capability queries the propagation
/// bridge dispatches on. All of them default to "plain task".
pub trait Task: Send + 'static {
    /// Run the task, consuming it
    fn run(self: Box<Self>);

    /// Already carries a captured trace context
    fn is_context_carrier(&self) -> bool {
        false
    }

    /// Belongs to a scheduler that propagates context on its own
    /// (fork-join style continuations). Such tasks are never wrapped.
    fn manages_own_context(&self) -> bool {
        false
    }

    /// Has an ordering its container relies on (e.g. it sits in a priority
    /// queue), so it must not be replaced by a wrapper.
    fn is_ordered(&self) -> bool {
        false
    }

    /// Number of fields exposed through [`field_mut`](Self::field_mut)
    fn field_count(&self) -> usize {
        0
    }

    /// Structural view of the field declared at `index`
    fn field_mut(&mut self, _index: usize) -> Option<TaskField<'_>> {
        None
    }

    /// Identity of the concrete task shape, used to cache structural lookups
    fn shape(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn shape_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

pub type BoxedTask = Box<dyn Task>;

/// One declared field of a task, as seen by the propagation bridge
pub enum TaskField<'a> {
    /// A slot holding an inner task. `ordered` is true when the inner task
    /// type itself carries an ordering.
    Delegate {
        slot: &'a mut DelegateSlot,
        ordered: bool,
    },
    /// Any other field
    Value,
}

/// Holds the inner task of a composite task so the bridge can replace it
#[derive(Default)]
pub struct DelegateSlot(Option<BoxedTask>);

impl DelegateSlot {
    pub fn new(task: BoxedTask) -> Self {
        Self(Some(task))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&dyn Task> {
        self.0.as_deref()
    }

    pub fn take(&mut self) -> Option<BoxedTask> {
        self.0.take()
    }

    pub fn put(&mut self, task: BoxedTask) {
        self.0 = Some(task);
    }

    /// Run the held task, if any
    pub fn run(self) {
        if let Some(task) = self.0 {
            task.run();
        }
    }
}

impl fmt::Debug for DelegateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(task) => write!(f, "DelegateSlot({})", task.shape_name()),
            None => f.write_str("DelegateSlot(empty)"),
        }
    }
}

/// Closure adapter produced by [`task_fn`]
pub struct FnTask<F>(F);

impl<F> Task for FnTask<F>
where
    F: FnOnce() + Send + 'static,
{
    fn run(self: Box<Self>) {
        (self.0)()
    }
}

/// Box a closure as a task
pub fn task_fn<F>(f: F) -> BoxedTask
where
    F: FnOnce() + Send + 'static,
{
    Box::new(FnTask(f))
}
