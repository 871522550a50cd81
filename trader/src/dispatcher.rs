use std::{
    fmt::Display,
    io::Error,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError},
        Arc,
    },
    thread::{Builder, JoinHandle},
    time::Duration,
};

use log::{debug, info, log_enabled, warn, Level};

use crate::{pending::PendingRequests, prelude::*};

/// How often an idle dispatcher checks whether it was asked to stop.
const IDLE_POLL: Duration = Duration::from_millis(20);

/// Owns the thread that consumes [TraderEvent]s posted by [ChannelSpi].
///
/// For every event it first updates the connection status, then hands any reply to [PendingRequests]
/// and finally replays the event on the application [TraderSpi]. None of this runs on the transport thread.
#[derive(Debug)]
pub struct Dispatcher {
    name: String,
    running: Arc<AtomicBool>,
    jh_executor: Option<JoinHandle<()>>,
}
impl Dispatcher {
    pub fn spawn(name: &str, rx_event: Receiver<TraderEvent>, pending: Arc<PendingRequests>, connected: Arc<AtomicBool>, app_spi: Arc<dyn TraderSpi>) -> Result<Self, Error> {
        let running = Arc::new(AtomicBool::new(true));
        let executor = Executor {
            rx_event,
            pending,
            connected,
            app_spi,
            running: running.clone(),
        };
        let jh_executor = Builder::new().name(name.to_owned()).spawn(move || executor.run())?;
        Ok(Self {
            name: name.to_owned(),
            running,
            jh_executor: Some(jh_executor),
        })
    }
    /// Stops the dispatcher thread and waits for it to exit. Events still queued are discarded.
    /// Calling it again is a no-op.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(jh) = self.jh_executor.take() {
            if jh.join().is_err() && log_enabled!(Level::Warn) {
                warn!("{} executor thread panicked", self);
            }
        }
    }
    pub fn is_running(&self) -> bool {
        self.jh_executor.is_some() && self.running.load(Ordering::SeqCst)
    }
}
impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
impl Display for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<{}, running: {}>", asserted_short_name!("Dispatcher", Self), self.name, self.is_running())
    }
}

/// Runs in the dispatcher thread.
struct Executor {
    rx_event: Receiver<TraderEvent>,
    pending: Arc<PendingRequests>,
    connected: Arc<AtomicBool>,
    app_spi: Arc<dyn TraderSpi>,
    running: Arc<AtomicBool>,
}
impl Executor {
    fn run(self) {
        while self.running.load(Ordering::SeqCst) {
            match self.rx_event.recv_timeout(IDLE_POLL) {
                Ok(event) => self.on_event(event),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    if log_enabled!(Level::Info) {
                        info!("event channel closed, {} exiting", self.app_spi);
                    }
                    break;
                }
            }
        }
        if log_enabled!(Level::Info) {
            info!("dispatcher terminated, {} requests left pending", self.pending.len());
        }
    }

    fn on_event(&self, event: TraderEvent) {
        match event {
            TraderEvent::FrontConnected => self.connected.store(true, Ordering::SeqCst),
            TraderEvent::FrontDisconnected(_) => self.connected.store(false, Ordering::SeqCst),
            _ => {}
        }
        if let Some(reply) = event.caller_reply() {
            if !self.pending.complete(&reply) && log_enabled!(Level::Debug) {
                debug!("{} no waiter, delivered to application only", event);
            }
        }
        event.notify(self.app_spi.as_ref());
    }
}
