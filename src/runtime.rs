//! Runtime abstraction layer for async operations
//!
//! The map view runs on a single-threaded event loop. This module describes
//! the two collaborators it needs from the host: something that loads the map
//! engine's modules, and something that runs local futures to completion.

use crate::{
    prelude::{LocalBoxFuture, Pin},
    MapError, Result,
};
use futures::{channel::oneshot, future::FutureExt, Future};
use std::{cell::RefCell, rc::Rc};

/// Loads the code and assets of named modules
pub trait AssetLoader {
    /// Resolves once `module` is usable. A future that never completes means
    /// the module never became available.
    fn using(&self, module: &str) -> LocalBoxFuture<'static, Result<()>>;
}

/// Loader for hosts where the engine is linked in: every module is ready at once
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadyLoader;

impl AssetLoader for ReadyLoader {
    fn using(&self, module: &str) -> LocalBoxFuture<'static, Result<()>> {
        log::debug!("module {module} is built in");
        futures::future::ready(Ok(())).boxed_local()
    }
}

/// Loader whose modules become available when its [`LoadGate`] is opened.
///
/// Useful when readiness is signalled by the host (a script `onload`
/// callback, a test step). Dropping the gate without opening it leaves every
/// pending load unresolved.
pub struct GatedLoader {
    waiters: Rc<RefCell<Vec<oneshot::Sender<Result<()>>>>>,
}

/// Handle that resolves or fails the loads of a [`GatedLoader`]
pub struct LoadGate {
    waiters: Rc<RefCell<Vec<oneshot::Sender<Result<()>>>>>,
}

impl GatedLoader {
    pub fn new() -> (Self, LoadGate) {
        let waiters = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                waiters: waiters.clone(),
            },
            LoadGate { waiters },
        )
    }
}

impl AssetLoader for GatedLoader {
    fn using(&self, module: &str) -> LocalBoxFuture<'static, Result<()>> {
        let (sender, receiver) = oneshot::channel();
        self.waiters.borrow_mut().push(sender);

        let module = module.to_string();
        async move {
            match receiver.await {
                Ok(result) => result,
                // Gate dropped: the load never finishes
                Err(oneshot::Canceled) => futures::future::pending().await,
            }
        }
        .map(move |result: Result<()>| {
            if result.is_ok() {
                log::debug!("module {module} loaded");
            }
            result
        })
        .boxed_local()
    }
}

impl LoadGate {
    /// Resolves every load requested so far
    pub fn open(&self) {
        for waiter in self.waiters.borrow_mut().drain(..) {
            let _ = waiter.send(Ok(()));
        }
    }

    /// Fails every load requested so far
    pub fn fail(&self, reason: &str) {
        for waiter in self.waiters.borrow_mut().drain(..) {
            let _ = waiter.send(Err(MapError::AssetLoad(reason.to_string()).into()));
        }
    }

    /// Number of loads waiting on the gate
    pub fn pending(&self) -> usize {
        self.waiters.borrow().len()
    }
}

/// A trait for spawning local (non-`Send`) async tasks
pub trait LocalSpawner {
    fn spawn_local_boxed(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> Result<()>;
}

impl LocalSpawner for futures::executor::LocalSpawner {
    fn spawn_local_boxed(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> Result<()> {
        use futures::task::LocalSpawnExt;
        self.spawn_local(future)
            .map_err(|e| MapError::Spawn(e.to_string()).into())
    }
}

/// Convenience function for spawning with type inference
pub fn spawn_local<S, F>(spawner: &S, future: F) -> Result<()>
where
    S: LocalSpawner + ?Sized,
    F: Future<Output = ()> + 'static,
{
    spawner.spawn_local_boxed(Box::pin(future))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;

    #[test]
    fn test_ready_loader_resolves() {
        let result = futures::executor::block_on(ReadyLoader.using("engine"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_gated_loader_waits_for_gate() {
        let (loader, gate) = GatedLoader::new();
        let mut pool = LocalPool::new();
        let done = Rc::new(RefCell::new(None));

        let sink = done.clone();
        let load = loader.using("engine");
        spawn_local(&pool.spawner(), async move {
            *sink.borrow_mut() = Some(load.await.is_ok());
        })
        .unwrap();

        pool.run_until_stalled();
        assert_eq!(*done.borrow(), None);
        assert_eq!(gate.pending(), 1);

        gate.open();
        pool.run_until_stalled();
        assert_eq!(*done.borrow(), Some(true));
    }

    #[test]
    fn test_gate_failure() {
        let (loader, gate) = GatedLoader::new();
        let load = loader.using("engine");
        gate.fail("404");

        let err = futures::executor::block_on(load).unwrap_err();
        assert_eq!(err.to_string(), "Asset load error: 404");
    }

    #[test]
    fn test_dropped_gate_never_resolves() {
        let (loader, gate) = GatedLoader::new();
        let mut pool = LocalPool::new();
        let done = Rc::new(RefCell::new(false));

        let sink = done.clone();
        let load = loader.using("engine");
        spawn_local(&pool.spawner(), async move {
            let _ = load.await;
            *sink.borrow_mut() = true;
        })
        .unwrap();

        drop(gate);
        pool.run_until_stalled();
        assert!(!*done.borrow());
    }
}
