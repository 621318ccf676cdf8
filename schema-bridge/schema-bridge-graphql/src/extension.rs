//! Middleware around field resolvers.

use std::{
    any::Any,
    cell::Cell,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, OnceLock, mpsc},
};

use async_trait::async_trait;
use futures_util::{FutureExt, StreamExt};
use tracing::{trace, warn};

use crate::resolver::{ResolveParams, Resolver, ResolverError, ResolverResult};

/// A link in the chain of extensions every resolver call passes through.
///
/// Extensions run in registration order, the last one calls the resolver.
#[async_trait]
pub trait Extension: Send + Sync + 'static {
    async fn resolve(&self, next: Next<'_>, params: ResolveParams) -> ResolverResult {
        next.run(params).await
    }
}

/// The rest of the chain, ending in the resolver.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Extension>],
    resolver: &'a Resolver,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Arc<dyn Extension>], resolver: &'a Resolver) -> Self {
        Self { chain, resolver }
    }

    /// Whether the chain ends in a blocking resolver.
    pub fn is_blocking(&self) -> bool {
        matches!(self.resolver, Resolver::Sync(_))
    }

    pub async fn run(self, params: ResolveParams) -> ResolverResult {
        match self.chain.split_first() {
            Some((first, chain)) => {
                first
                    .resolve(
                        Next {
                            chain,
                            resolver: self.resolver,
                        },
                        params,
                    )
                    .await
            }
            None => match self.resolver {
                Resolver::Sync(resolver) => resolver(params),
                Resolver::Async(resolver) => resolver(params).await,
                Resolver::Stream(resolver) => {
                    // outside of subscriptions, the first event is the value
                    match resolver(params).next().await {
                        Some(result) => result,
                        None => Ok(Default::default()),
                    }
                }
            },
        }
    }
}

/// The rest of a chain, detached from the request so it can move to another thread.
struct DetachedNext {
    chain: Vec<Arc<dyn Extension>>,
    resolver: Resolver,
}

impl DetachedNext {
    fn new(next: &Next<'_>) -> Self {
        Self {
            chain: next.chain.to_vec(),
            resolver: next.resolver.clone(),
        }
    }

    fn block_on(self, params: ResolveParams) -> ResolverResult {
        let _offloaded = OffloadedGuard::enter();
        futures_executor::block_on(Next::new(&self.chain, &self.resolver).run(params))
    }
}

thread_local! {
    static OFFLOADED: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as running an offloaded chain.
struct OffloadedGuard {
    previous: bool,
}

impl OffloadedGuard {
    fn enter() -> Self {
        Self {
            previous: OFFLOADED.replace(true),
        }
    }

    fn is_active() -> bool {
        OFFLOADED.get()
    }
}

impl Drop for OffloadedGuard {
    fn drop(&mut self) {
        OFFLOADED.set(self.previous);
    }
}

type Job = Box<dyn FnOnce() + Send>;

enum Target<'s> {
    Worker(&'s mpsc::Sender<Job>),
    BlockingPool(tokio::runtime::Handle),
}

/// Makes blocking resolvers suspension-capable by running them off the executor.
///
/// With `thread_sensitive` every blocking resolver runs on one dedicated thread,
/// one call at a time. Otherwise they run on the blocking pool of the current
/// tokio runtime, or inline when there is none.
/// Extensions registered after this one run offloaded together with the resolver.
/// Introspection fields and suspension-capable resolvers are not touched.
pub struct SyncToAsync {
    thread_sensitive: bool,
    worker: OnceLock<Option<mpsc::Sender<Job>>>,
}

impl SyncToAsync {
    pub fn new(thread_sensitive: bool) -> Self {
        Self {
            thread_sensitive,
            worker: OnceLock::new(),
        }
    }

    pub fn thread_sensitive(&self) -> bool {
        self.thread_sensitive
    }

    fn worker(&self) -> Option<&mpsc::Sender<Job>> {
        self.worker
            .get_or_init(|| {
                let (sender, receiver) = mpsc::channel::<Job>();
                let spawned = std::thread::Builder::new()
                    .name("sync-to-async".into())
                    .spawn(move || {
                        for job in receiver {
                            job();
                        }
                    });
                match spawned {
                    Ok(_) => Some(sender),
                    Err(error) => {
                        warn!("could not start resolver thread, running inline: {error}");
                        None
                    }
                }
            })
            .as_ref()
    }

    fn target(&self) -> Option<Target<'_>> {
        if self.thread_sensitive {
            self.worker().map(Target::Worker)
        } else {
            tokio::runtime::Handle::try_current()
                .ok()
                .map(Target::BlockingPool)
        }
    }

    /// Runs the rest of the chain, blocking resolver included, off the executor.
    async fn offload(&self, next: Next<'_>, params: ResolveParams) -> ResolverResult {
        let field = format!("{}.{}", params.info.parent_type, params.info.field_name);

        let Some(target) = self.target() else {
            return AssertUnwindSafe(next.run(params))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(panic_error(&field, panic)));
        };

        let detached = DetachedNext::new(&next);
        let (sender, receiver) = tokio::sync::oneshot::channel();
        let job = move || {
            let result = catch_unwind(AssertUnwindSafe(|| detached.block_on(params)))
                .unwrap_or_else(|panic| Err(panic_error(&field, panic)));
            let _ = sender.send(result);
        };

        match target {
            Target::Worker(worker) => {
                trace!("resolving on the resolver thread");
                if worker.send(Box::new(job)).is_err() {
                    warn!("resolver thread is gone");
                }
            }
            Target::BlockingPool(handle) => {
                trace!("resolving on the blocking pool");
                handle.spawn_blocking(job);
            }
        }

        receiver
            .await
            .unwrap_or_else(|_| Err(ResolverError::new("resolver did not complete")))
    }
}

impl Default for SyncToAsync {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl Extension for SyncToAsync {
    async fn resolve(&self, next: Next<'_>, params: ResolveParams) -> ResolverResult {
        if params.info.is_introspection() || !next.is_blocking() || OffloadedGuard::is_active()
        {
            return next.run(params).await;
        }
        self.offload(next, params).await
    }
}

fn panic_error(field: &str, panic: Box<dyn Any + Send>) -> ResolverError {
    let message = panic
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "resolver panicked".to_string());
    warn!("resolver of {field} panicked: {message}");
    ResolverError::new(message)
}

/// Runs a resolver through the extension chain.
pub(crate) async fn resolve_with(
    extensions: &[Arc<dyn Extension>],
    resolver: &Resolver,
    params: ResolveParams,
) -> ResolverResult {
    Next::new(extensions, resolver).run(params).await
}
