use crate::{
    core::Timer,
    infra::{
        commands::{CommandSource, TimerCommand, TimerHandle},
        ticker::{TickSource, TickStream},
    },
    utils::{App, EventHandler, EventSource, Logger},
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Owns a [`Timer`] and serializes everything that touches it — commands
/// from [`TimerHandle`] clones and ticks from the active tick stream — on a
/// single task.
pub struct TimerApp {
    timer: Timer,
    command_source: CommandSource,
    tick_source: Box<dyn TickSource>,
    ticks: Option<TickStream>,
    logger: Arc<dyn Logger>,
}

impl TimerApp {
    pub fn new(tick_source: Box<dyn TickSource>, logger: Arc<dyn Logger>) -> (Self, TimerHandle) {
        let (command_source, handle) = CommandSource::new();
        let app = Self {
            timer: Timer::new(),
            command_source,
            tick_source,
            ticks: None,
            logger,
        };
        (app, handle)
    }

    pub async fn run(
        &mut self,
        termination_receiver: oneshot::Receiver<()>,
        readiness_sender: oneshot::Sender<()>,
    ) -> Result<()> {
        let mut commands = self
            .command_source
            .take_stream(termination_receiver)
            .context("Missing command stream")?;

        readiness_sender
            .send(())
            .map_err(|_| anyhow::anyhow!("Failed to send readiness signal"))?;

        loop {
            tokio::select! {
                command = commands.next() => {
                    match command {
                        Some(command) => {
                            if let Err(err) = self.handle_event(command).await {
                                self.logger.error(&format!("Error handling command {err}"));
                            }
                        }
                        None => {
                            self.logger.info("Command stream terminated");
                            break;
                        }
                    }
                }

                tick = next_tick(&mut self.ticks) => {
                    match tick {
                        Some(()) => self.timer.tick(),
                        // The stream ended; forget it so we wait on commands only.
                        None => self.ticks = None,
                    }
                }
            }
        }

        Ok(())
    }
}

async fn next_tick(ticks: &mut Option<TickStream>) -> Option<()> {
    match ticks.as_mut() {
        Some(ticks) => ticks.next().await,
        None => std::future::pending().await,
    }
}

#[async_trait(?Send)]
impl EventHandler for TimerApp {
    type Event = TimerCommand;

    async fn handle_event(&mut self, command: TimerCommand) -> Result<()> {
        match command {
            TimerCommand::Each { id, callback, reply } => {
                let id = match id {
                    Some(id) => self.timer.each_with_id(id, callback),
                    None => self.timer.each(callback),
                };
                self.logger
                    .debug(&format!("Registered per-tick callback {}", id.uuid()));
                let _ = reply.send(id);
            }
            TimerCommand::RemoveCallback(id) => {
                self.timer.remove_callback(&id);
                self.logger
                    .debug(&format!("Removed per-tick callback {}", id.uuid()));
            }
            TimerCommand::Once { second, callback } => {
                self.timer.once(second, callback);
                self.logger
                    .debug(&format!("Registered one-shot callback for {second}s"));
            }
            TimerCommand::Start { reply } => {
                let started = self.timer.start();
                if started {
                    self.ticks = Some(self.tick_source.ticks());
                    self.logger.info("Timer started");
                }
                let _ = reply.send(started);
            }
            TimerCommand::Stop { reply } => {
                let stopped = self.timer.stop();
                if stopped {
                    self.ticks = None;
                    self.logger.info("Timer stopped");
                }
                let _ = reply.send(stopped);
            }
            TimerCommand::Reset => {
                self.ticks = None;
                self.timer.reset();
                self.logger.info("Timer reset");
            }
            TimerCommand::IsRunning { reply } => {
                let _ = reply.send(self.timer.is_running());
            }
            TimerCommand::Elapsed { reply } => {
                let _ = reply.send(self.timer.elapsed());
            }
        }

        Ok(())
    }
}

#[async_trait(?Send)]
impl App for TimerApp {
    async fn run(
        &mut self,
        termination_receiver: oneshot::Receiver<()>,
        readiness_sender: oneshot::Sender<()>,
    ) -> Result<()> {
        TimerApp::run(self, termination_receiver, readiness_sender).await
    }
}
