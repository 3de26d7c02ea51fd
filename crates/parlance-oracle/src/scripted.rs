//! Scripted oracle for deterministic tests.
//!
//! Engine tests script the oracle's replies up front and assert on the
//! prompts it was sent, so no test ever makes an API call.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::Oracle;
use crate::error::{OracleError, OracleResult};

/// An oracle that returns scripted replies in order.
///
/// Once the script is exhausted it returns the fallback text, or
/// [`OracleError::ScriptExhausted`] when none was configured. Every call
/// is logged so tests can assert on the prompts that were sent.
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<RecordedCall>>,
    fallback: Option<String>,
}

/// One recorded oracle call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The system prompt the engine sent.
    pub system: String,
    /// The user message the engine sent.
    pub user: String,
}

impl ScriptedOracle {
    /// Create an oracle with no scripted replies.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            fallback: None,
        }
    }

    /// Create an oracle preloaded with replies.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let oracle = Self::new();
        for reply in replies {
            oracle.queue(reply);
        }
        oracle
    }

    /// Set the text returned when the script runs out.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Append a reply to the script.
    pub fn queue(&self, reply: impl Into<String>) {
        self.lock_replies().push_back(reply.into());
    }

    /// How many scripted replies remain unconsumed.
    pub fn remaining(&self) -> usize {
        self.lock_replies().len()
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_calls().clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, system: &str, user: &str) -> OracleResult<String> {
        self.lock_calls().push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
        });
        if let Some(reply) = self.lock_replies().pop_front() {
            return Ok(reply);
        }
        self.fallback.clone().ok_or(OracleError::ScriptExhausted)
    }
}
