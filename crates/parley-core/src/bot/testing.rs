//! Scripted transport, generator and storage shared by the bot tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use parley_types::error::StoreError;
use parley_types::generation::GenerationError;
use parley_types::message::{InboundMessage, TransportError};

use crate::generation::generator::Generator;
use crate::history::storage::HistoryStorage;

use super::transport::ChatTransport;

/// Transport replaying a fixed list of inbound messages.
///
/// Once the list is drained the stream ends, unless the transport is held
/// open, in which case `next_message` never resolves.
#[derive(Default)]
pub struct ScriptedTransport {
    bot: String,
    inbound: Mutex<VecDeque<InboundMessage>>,
    hold_open: bool,
    pub sent: Mutex<Vec<InboundMessage>>,
    pub typing: AtomicUsize,
    next_id: AtomicI64,
}

impl ScriptedTransport {
    pub fn new(bot: &str, messages: Vec<InboundMessage>) -> Self {
        Self {
            bot: bot.to_string(),
            inbound: Mutex::new(messages.into()),
            next_id: AtomicI64::new(1000),
            ..Self::default()
        }
    }

    pub fn held_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn typing_count(&self) -> usize {
        self.typing.load(Ordering::SeqCst)
    }
}

impl ChatTransport for ScriptedTransport {
    async fn next_message(&self) -> Option<InboundMessage> {
        let next = self.inbound.lock().unwrap().pop_front();
        match next {
            Some(message) => Some(message),
            None if self.hold_open => std::future::pending().await,
            None => None,
        }
    }

    async fn send_typing(&self, _chat_id: i64) -> Result<(), TransportError> {
        self.typing.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reply(&self, to: &InboundMessage, text: &str) -> Result<InboundMessage, TransportError> {
        let sent = InboundMessage {
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            chat_id: to.chat_id,
            chat_title: to.chat_title.clone(),
            chat_kind: to.chat_kind,
            sender: self.bot.clone(),
            text: text.to_string(),
            reply_to: Some(Box::new(to.clone())),
        };
        self.sent.lock().unwrap().push(sent.clone());
        Ok(sent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCall {
    pub dialog: Vec<String>,
    pub settings_path: PathBuf,
    pub label: String,
}

/// Generator answering `reply <n>` for its n-th call, or failing every call.
#[derive(Default)]
pub struct ScriptedGenerator {
    pub calls: Mutex<Vec<GenerateCall>>,
    pub fail: bool,
}

impl ScriptedGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl Generator for ScriptedGenerator {
    async fn send(
        &self,
        dialog: Vec<String>,
        settings_path: &Path,
        context_label: &str,
    ) -> Result<String, GenerationError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(GenerateCall {
                dialog,
                settings_path: settings_path.to_path_buf(),
                label: context_label.to_string(),
            });
            calls.len()
        };
        if self.fail {
            return Err(GenerationError::Status {
                status: 500,
                body: "out of memory".to_string(),
            });
        }
        Ok(format!("reply {n}"))
    }
}

/// In-memory history document.
#[derive(Default)]
pub struct MemoryStorage {
    pub writes: AtomicUsize,
    pub data: Mutex<Vec<u8>>,
}

impl MemoryStorage {
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl HistoryStorage for MemoryStorage {
    async fn read(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.data.lock().unwrap().clone())
    }

    async fn write(&self, data: &[u8]) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.data.lock().unwrap() = data.to_vec();
        Ok(())
    }
}
