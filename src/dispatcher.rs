//! Turns a prompt into two independent background API calls.
//!
//! Each call runs in its own tokio task and reports exactly one
//! [`GenerationEvent`] through a bounded channel. The UI loop drains the
//! channel on its own turn, so worker tasks never touch UI state.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::ai::OpenAIClient;
use crate::config::Config;
use crate::prompts::GenerationRequest;
use crate::target::Target;

pub const EVENT_QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed(String),
    /// Human-readable message naming the target and the cause.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationEvent {
    /// Which submit produced this event.
    pub generation: u64,
    pub target: Target,
    pub outcome: GenerationOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Empty or whitespace-only prompt; nothing was sent.
    Rejected,
    Started { generation: u64 },
}

pub fn event_channel() -> (mpsc::Sender<GenerationEvent>, mpsc::Receiver<GenerationEvent>) {
    mpsc::channel(EVENT_QUEUE_CAPACITY)
}

pub struct Dispatcher {
    client: OpenAIClient,
    events: mpsc::Sender<GenerationEvent>,
    generation: u64,
}

impl Dispatcher {
    pub fn new(config: &Config, events: mpsc::Sender<GenerationEvent>) -> Result<Self> {
        Ok(Self {
            client: OpenAIClient::new(config)?,
            events,
            generation: 0,
        })
    }

    /// Swap in a client built from `config`. The generation counter carries
    /// on, so results from calls made with the old client are still stale.
    pub fn reconfigure(&mut self, config: &Config) -> Result<()> {
        self.client = OpenAIClient::new(config)?;
        Ok(())
    }

    /// Generation of the most recent accepted dispatch (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Spawn one task per target. Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, prompt: &str) -> Dispatch {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            debug!("rejected empty prompt");
            return Dispatch::Rejected;
        }

        self.generation += 1;
        let generation = self.generation;
        info!(generation, prompt_chars = prompt.chars().count(), "dispatching generation pair");

        for request in GenerationRequest::pair(prompt) {
            let client = self.client.clone();
            let events = self.events.clone();
            tokio::spawn(async move {
                let event = run_request(&client, generation, request).await;
                if events.send(event).await.is_err() {
                    debug!(generation, "event receiver dropped before delivery");
                }
            });
        }

        Dispatch::Started { generation }
    }
}

async fn run_request(client: &OpenAIClient, generation: u64, request: GenerationRequest) -> GenerationEvent {
    let target = request.target;

    let outcome = match client.query(&request.prompt).await {
        Ok(text) => {
            info!(generation, target = target.as_str(), chars = text.chars().count(), "generation complete");
            GenerationOutcome::Completed(text)
        }
        Err(e) => {
            warn!(generation, target = target.as_str(), error = %e, "generation failed");
            GenerationOutcome::Failed(format!("{} generation failed: {}", target.display_name(), e))
        }
    };

    GenerationEvent { generation, target, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompts_are_rejected_without_advancing_generation() {
        let (tx, mut rx) = event_channel();
        let mut dispatcher = Dispatcher::new(&Config::new(), tx).unwrap();

        for prompt in ["", "   ", "\t\n"] {
            assert_eq!(dispatcher.dispatch(prompt), Dispatch::Rejected);
        }
        assert_eq!(dispatcher.generation(), 0);
        assert!(rx.try_recv().is_err());
    }
}
