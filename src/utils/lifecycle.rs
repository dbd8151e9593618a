use anyhow::Context;
use tokio::{sync::oneshot, task::JoinHandle};

use crate::utils::App;

/// Runs an [`App`] on a local task and owns its termination signal.
pub struct Lifecycle<T: App> {
    app: Option<T>,
    termination_sender: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<anyhow::Result<()>>>,
}

impl<T: App + 'static> Lifecycle<T> {
    pub fn new(app: T) -> Self {
        Self {
            app: Some(app),
            termination_sender: None,
            handle: None,
        }
    }

    /// Spawns the app. The returned receiver resolves once the app is ready.
    pub async fn start(&mut self) -> anyhow::Result<oneshot::Receiver<()>> {
        let mut app = self.app.take().context("Application has already started")?;

        let (termination_sender, termination_receiver) = oneshot::channel();
        let (readiness_sender, readiness_receiver) = oneshot::channel();

        let handle = tokio::task::spawn_local(async move {
            app.run(termination_receiver, readiness_sender).await
        });

        self.termination_sender = Some(termination_sender);
        self.handle = Some(handle);

        Ok(readiness_receiver)
    }

    /// Signals the app to terminate. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(termination_sender) = self.termination_sender.take() {
            let _ = termination_sender.send(());
        }
    }

    /// Waits for the app task to finish and reports its outcome.
    pub async fn join(&mut self) -> anyhow::Result<()> {
        match self.handle.take() {
            Some(handle) => handle.await.context("Application task panicked")?,
            None => Ok(()),
        }
    }
}
