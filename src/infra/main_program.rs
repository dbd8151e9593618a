use crate::{
    infra::{IntervalTickSource, TimerApp, TimerHandle},
    utils::{Logger, StdoutLogger},
};
use anyhow::{Context, Result};
use std::{cell::Cell, sync::Arc};
use tokio::sync::oneshot;

/// Wires the timer app to the process: logger, ctrl-c termination, and a
/// demo per-second callback so the binary has something to show.
pub struct MainProgram {
    logger: Arc<dyn Logger>,
}

impl MainProgram {
    pub fn new() -> Self {
        Self {
            logger: Arc::new(StdoutLogger::new()),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (termination_sender, termination_receiver) = oneshot::channel();
        let (readiness_sender, readiness_receiver) = oneshot::channel();

        self.set_ctrlc_handler(termination_sender)?;
        self.log_startup_banner();

        let (mut app, handle) = TimerApp::new(
            Box::new(IntervalTickSource::per_second()),
            self.logger.clone(),
        );

        let logger = self.logger.clone();
        tokio::spawn(async move {
            if readiness_receiver.await.is_err() {
                return;
            }
            logger.info("Application is ready");
            if let Err(err) = start_demo_timer(&handle, logger.clone()).await {
                logger.error(&format!("Failed to start timer: {err}"));
            }
        });

        app.run(termination_receiver, readiness_sender)
            .await
            .context("Timer application run failed")
    }

    fn log_startup_banner(&self) {
        self.logger
            .info(&format!("chime - version {}", env!("CARGO_PKG_VERSION")));
    }

    fn set_ctrlc_handler(&self, termination_sender: oneshot::Sender<()>) -> Result<()> {
        let termination_sender = Cell::new(Some(termination_sender));
        ctrlc::set_handler(move || {
            if let Some(sender) = termination_sender.take() {
                let _ = sender.send(());
            }
        })
        .context("Error setting Ctrl-C handler")?;

        self.logger.info("Press CTRL-C to terminate program");

        Ok(())
    }
}

impl Default for MainProgram {
    fn default() -> Self {
        Self::new()
    }
}

async fn start_demo_timer(handle: &TimerHandle, logger: Arc<dyn Logger>) -> Result<()> {
    let each_logger = logger.clone();
    handle
        .each(move |second| each_logger.info(&format!("{second}s elapsed")))
        .await?;

    handle
        .once(10, move |second| {
            logger.info(&format!("Reached {second}s, still counting"))
        })
        .await?;

    handle.start().await?;
    Ok(())
}
