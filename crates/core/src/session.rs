use crate::graph::{Graph, GraphBuilder, NodeId, NodeValue, ShaderType, TypeMismatch};
use crate::registry::{Registry, RegistryError, UniformValue};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::panic::Location;
use thiserror::Error;

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

/// State of one in-flight shader modifier compile: the uniform registry
/// spans both hooks, the graph builder is replaced per hook.
#[derive(Default)]
struct Session {
    builder: GraphBuilder,
    registry: Registry,
    registry_fault: Option<RegistryError>,
}

/// Re-entrant use of the compiler: only one shader modifier compile may be
/// in flight per thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("a shader modifier compile is already in flight on this thread")]
pub struct StateError;

/// Exclusive handle to the thread's compile session.
///
/// Constructed by [`SessionGuard::begin`] at the top of a compile; dropping
/// it clears the slot, including on unwind, so a failed compile never
/// corrupts the next one.
pub struct SessionGuard(PhantomData<*const ()>);

impl SessionGuard {
    pub fn begin() -> Result<Self, StateError> {
        SESSION.with(|session| {
            let mut slot = session.borrow_mut();
            if slot.is_some() {
                return Err(StateError);
            }

            *slot = Some(Session::default());
            Ok(SessionGuard(PhantomData))
        })
    }

    /// Runs one hook's modifier function against a fresh graph builder and
    /// finishes the graph rooted at the node the function returns.
    pub fn collect(&mut self, f: impl FnOnce() -> NodeId) -> Result<Graph, TypeMismatch> {
        with(|session| session.builder = GraphBuilder::new());
        let root = f();
        with(|session| std::mem::take(&mut session.builder)).finish(root)
    }

    /// First registry fault recorded by a declarator while a hook ran.
    pub fn registry_fault(&self) -> Option<RegistryError> {
        with(|session| session.registry_fault.clone())
    }

    /// Ends the session, yielding the accumulated uniform table.
    pub fn finish(self) -> Result<Registry, RegistryError> {
        let session = SESSION
            .with(|session| session.borrow_mut().take())
            .expect("compile session vanished mid-flight");
        std::mem::forget(self);

        match session.registry_fault {
            Some(fault) => Err(fault),
            None => Ok(session.registry),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        SESSION.with(|session| *session.borrow_mut() = None);
    }
}

fn with<R>(f: impl FnOnce(&mut Session) -> R) -> R {
    SESSION.with(|session| {
        let mut slot = session.borrow_mut();
        let session = slot
            .as_mut()
            .expect("not executing inside a shader modifier compile");
        f(session)
    })
}

pub(crate) fn push_node(
    value: NodeValue,
    internal: bool,
    location: Option<&'static Location<'static>>,
) -> NodeId {
    with(|session| session.builder.push(value, internal, location))
}

pub(crate) fn type_of(id: NodeId) -> ShaderType {
    with(|session| session.builder.type_of(id))
}

pub(crate) fn record_mismatch(fault: TypeMismatch) {
    with(|session| session.builder.record_fault(fault));
}

pub(crate) fn declare_uniform(ty: ShaderType, name: &str, value: UniformValue) {
    with(|session| {
        if let Err(fault) = session.registry.declare(ty, name, value)
            && session.registry_fault.is_none()
        {
            session.registry_fault = Some(fault);
        }
    });
}

pub(crate) fn record_registry_fault(fault: RegistryError) {
    with(|session| {
        if session.registry_fault.is_none() {
            session.registry_fault = Some(fault);
        }
    });
}
