use crate::core::{CallbackId, EachCallback, OnceCallback, Seconds};
use crate::utils::EventSource;
use anyhow::{Context, Result, anyhow};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tokio::sync::{
    mpsc::{self, Sender},
    oneshot,
};
use tokio_stream::wrappers::ReceiverStream;

pub type CommandStream = Pin<Box<dyn Stream<Item = TimerCommand> + Send>>;

/// The operations a [`TimerHandle`] can ask the timer task to apply.
pub enum TimerCommand {
    Each {
        id: Option<CallbackId>,
        callback: EachCallback,
        reply: oneshot::Sender<CallbackId>,
    },
    RemoveCallback(CallbackId),
    Once {
        second: i64,
        callback: OnceCallback,
    },
    Start {
        reply: oneshot::Sender<bool>,
    },
    Stop {
        reply: oneshot::Sender<bool>,
    },
    Reset,
    IsRunning {
        reply: oneshot::Sender<bool>,
    },
    Elapsed {
        reply: oneshot::Sender<Seconds>,
    },
}

/// The receiving end of the command channel, surfaced as a terminable stream.
pub struct CommandSource {
    stream: Option<CommandStream>,
}

impl CommandSource {
    pub fn new() -> (Self, TimerHandle) {
        let (sender, receiver) = mpsc::channel::<TimerCommand>(1024);
        let source = Self {
            stream: Some(Box::pin(ReceiverStream::new(receiver))),
        };
        (source, TimerHandle { sender })
    }
}

impl EventSource for CommandSource {
    type Event = TimerCommand;
    type EventStream = CommandStream;

    fn take_stream(&mut self, termination: oneshot::Receiver<()>) -> Option<CommandStream> {
        let stream = self.stream.take()?;
        Some(Box::pin(stream.take_until(async move {
            let _ = termination.await;
        })))
    }
}

/// Cloneable async API onto a timer owned by a running [`TimerApp`] task.
///
/// Every method completes once the timer task has applied the command, and
/// fails if the task has terminated.
#[derive(Clone)]
pub struct TimerHandle {
    sender: Sender<TimerCommand>,
}

impl TimerHandle {
    /// Registers a per-tick callback under a generated id and returns the id.
    pub async fn each(
        &self,
        callback: impl FnMut(Seconds) + Send + 'static,
    ) -> Result<CallbackId> {
        self.register_each(None, Box::new(callback)).await
    }

    /// Registers a per-tick callback under the caller's id, replacing any
    /// existing callback with that id.
    pub async fn each_with_id(
        &self,
        id: CallbackId,
        callback: impl FnMut(Seconds) + Send + 'static,
    ) -> Result<CallbackId> {
        self.register_each(Some(id), Box::new(callback)).await
    }

    async fn register_each(
        &self,
        id: Option<CallbackId>,
        callback: EachCallback,
    ) -> Result<CallbackId> {
        let (reply, response) = oneshot::channel();
        self.send(TimerCommand::Each { id, callback, reply }).await?;
        response.await.context("Timer task dropped the reply")
    }

    /// Removes a per-tick callback. Unknown ids are ignored.
    pub async fn remove_callback(&self, id: CallbackId) -> Result<()> {
        self.send(TimerCommand::RemoveCallback(id)).await
    }

    /// Registers a one-shot callback for a target second. Negative targets
    /// are accepted and silently discarded.
    pub async fn once(
        &self,
        second: i64,
        callback: impl FnOnce(Seconds) + Send + 'static,
    ) -> Result<()> {
        self.send(TimerCommand::Once {
            second,
            callback: Box::new(callback),
        })
        .await
    }

    /// Starts the timer. `false` means it was already running.
    pub async fn start(&self) -> Result<bool> {
        self.request(|reply| TimerCommand::Start { reply }).await
    }

    /// Stops the timer. `false` means it was already stopped.
    pub async fn stop(&self) -> Result<bool> {
        self.request(|reply| TimerCommand::Stop { reply }).await
    }

    /// Stops the timer and zeroes its counter, keeping all callbacks.
    pub async fn reset(&self) -> Result<()> {
        self.send(TimerCommand::Reset).await
    }

    pub async fn is_running(&self) -> Result<bool> {
        self.request(|reply| TimerCommand::IsRunning { reply }).await
    }

    pub async fn elapsed(&self) -> Result<Seconds> {
        self.request(|reply| TimerCommand::Elapsed { reply }).await
    }

    async fn send(&self, command: TimerCommand) -> Result<()> {
        self.sender
            .send(command)
            .await
            .map_err(|_| anyhow!("Timer task has terminated"))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> TimerCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.send(command(reply)).await?;
        response.await.context("Timer task dropped the reply")
    }
}
