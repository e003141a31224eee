//! Poll loop
//!
//! Refresh, sleep, grow the interval, check the wall clock. The sleep is the
//! only point where cancellation is observed.

use super::types::{is_terminal_state_with, PollPolicy};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Something whose completion can be observed by refreshing it
#[async_trait]
pub trait Refreshable: Send {
    /// Re-fetch whatever state `is_done` inspects
    async fn refresh(&mut self) -> Result<()>;

    /// Stopping predicate
    fn is_done(&self) -> bool;
}

/// A resource that reports a provisioning/run status string
#[async_trait]
pub trait StatusResource: Send {
    /// Current status as last fetched from the service
    fn status(&self) -> &str;

    /// Re-fetch the resource and update its status
    async fn refresh(&mut self) -> Result<()>;
}

/// Adapts a refresh closure and predicate closure to [`Refreshable`]
struct FnTarget<R, D> {
    refresh: R,
    is_done: D,
}

#[async_trait]
impl<R, Fut, D> Refreshable for FnTarget<R, D>
where
    R: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send,
    D: Fn() -> bool + Send,
{
    async fn refresh(&mut self) -> Result<()> {
        (self.refresh)().await
    }

    fn is_done(&self) -> bool {
        (self.is_done)()
    }
}

/// Waits for a [`StatusResource`] to reach a terminal status
struct TerminalStatus<'a, S: ?Sized> {
    resource: &'a mut S,
    extra: &'a [&'a str],
}

#[async_trait]
impl<'a, S> Refreshable for TerminalStatus<'a, S>
where
    S: StatusResource + ?Sized,
{
    async fn refresh(&mut self) -> Result<()> {
        self.resource.refresh().await
    }

    fn is_done(&self) -> bool {
        is_terminal_state_with(self.resource.status(), self.extra)
    }
}

impl PollPolicy {
    /// Run `refresh` on a growing interval until `is_done` holds or the timeout elapses
    ///
    /// Returns the final value of `is_done()`: `true` when the predicate was
    /// satisfied, `false` when the timeout was reached first. Errors from
    /// `refresh` end the wait immediately; cancellation during the sleep
    /// returns [`Error::Cancelled`].
    pub async fn wait_for_completion<R, Fut, D>(
        &self,
        refresh: R,
        is_done: D,
        show_progress: bool,
        cancel: &CancellationToken,
    ) -> Result<bool>
    where
        R: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<()>> + Send,
        D: Fn() -> bool + Send,
    {
        let mut target = FnTarget { refresh, is_done };
        self.wait_for(&mut target, show_progress, cancel).await
    }

    /// Poll a [`StatusResource`] until its status is terminal
    ///
    /// `extra_terminal` adds resource-specific terminal values to the shared
    /// vocabulary.
    pub async fn wait_for_terminal_state<S>(
        &self,
        resource: &mut S,
        extra_terminal: &[&str],
        show_progress: bool,
        cancel: &CancellationToken,
    ) -> Result<bool>
    where
        S: StatusResource + ?Sized,
    {
        let mut target = TerminalStatus {
            resource,
            extra: extra_terminal,
        };
        self.wait_for(&mut target, show_progress, cancel).await
    }

    /// Poll a [`Refreshable`] target
    pub async fn wait_for<T>(
        &self,
        target: &mut T,
        show_progress: bool,
        cancel: &CancellationToken,
    ) -> Result<bool>
    where
        T: Refreshable + ?Sized,
    {
        let started = Instant::now();
        let mut current = self.initial_interval();
        let mut timed_out = false;
        let mut iteration: u32 = 0;

        while !target.is_done() && !timed_out {
            iteration += 1;
            if show_progress {
                info!("Waiting for {:.1} seconds", current.as_secs_f64());
            }

            target.refresh().await?;

            debug!(iteration, interval_ms = current.as_millis() as u64, "Sleeping before next poll");
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(iteration, "Poll cancelled");
                    return Err(Error::Cancelled);
                }
                () = tokio::time::sleep(current) => {}
            }

            current = self.next_interval(current);

            if started.elapsed() > self.timeout() {
                timed_out = true;
                if show_progress {
                    warn!("Wait for completion timed out after {:?}", started.elapsed());
                }
            }
        }

        Ok(target.is_done())
    }
}
