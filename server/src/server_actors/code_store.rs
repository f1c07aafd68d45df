use crate::messages::internal_messages::{IssueCode, VerifyCode};
use actix::prelude::*;
use colored::Color;
use common::constants::{CODE_LENGTH, CODE_MAX_ATTEMPTS};
use common::errors::CodeError;
use common::logger::Logger;
use common::utils::generate_numeric_code;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A code issued to one subject, alive until its deadline or until the
/// attempt budget is spent.
#[derive(Debug, Clone)]
pub struct CodeEntry {
    pub code: String,
    pub expires_at: Instant,
    pub attempts: u8,
}

/// Where issued codes live. The in-memory backend is the only one today;
/// the trait is the seam for an external store.
pub trait CodeBackend: Unpin + 'static {
    fn put(&mut self, subject: String, entry: CodeEntry);
    fn entry_mut(&mut self, subject: &str) -> Option<&mut CodeEntry>;
    fn remove(&mut self, subject: &str);
    /// Drops every entry past its deadline and returns how many went.
    fn sweep(&mut self, now: Instant) -> usize;
}

#[derive(Default)]
pub struct InMemoryBackend {
    entries: HashMap<String, CodeEntry>,
}

impl CodeBackend for InMemoryBackend {
    fn put(&mut self, subject: String, entry: CodeEntry) {
        self.entries.insert(subject, entry);
    }

    fn entry_mut(&mut self, subject: &str) -> Option<&mut CodeEntry> {
        self.entries.get_mut(subject)
    }

    fn remove(&mut self, subject: &str) {
        self.entries.remove(subject);
    }

    fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }
}

/// What a verification attempt concluded, decided before any entry is
/// removed so the borrow of the entry can end first.
enum Outcome {
    Missing,
    Expired,
    Matched,
    Mismatch { remaining: u8 },
    Exhausted,
}

/// Actor holding short-lived numeric verification codes.
///
/// Codes are minted on demand, consumed on first successful match, burned
/// after too many mismatches, and swept periodically once expired. Expiry is
/// also checked on the verification path, so a code never validates late
/// just because the sweeper has not run yet.
pub struct CodeStore<B: CodeBackend> {
    backend: B,
    sweep_interval: Duration,
    logger: Logger,
}

impl CodeStore<InMemoryBackend> {
    pub fn new(sweep_interval: Duration) -> Self {
        Self::with_backend(InMemoryBackend::default(), sweep_interval)
    }
}

impl<B: CodeBackend> CodeStore<B> {
    pub fn with_backend(backend: B, sweep_interval: Duration) -> Self {
        Self {
            backend,
            sweep_interval,
            logger: Logger::new("CodeStore", Color::Yellow),
        }
    }
}

impl<B: CodeBackend> Actor for CodeStore<B> {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        ctx.run_interval(self.sweep_interval, |actor, _ctx| {
            let swept = actor.backend.sweep(Instant::now());
            if swept > 0 {
                actor.logger.info(format!("Swept {swept} expired code(s)"));
            }
        });
    }
}

impl<B: CodeBackend> Handler<IssueCode> for CodeStore<B> {
    type Result = String;

    fn handle(&mut self, msg: IssueCode, _ctx: &mut Self::Context) -> Self::Result {
        let code = generate_numeric_code(CODE_LENGTH);
        self.backend.put(
            msg.subject.clone(),
            CodeEntry {
                code: code.clone(),
                expires_at: Instant::now() + msg.ttl,
                attempts: 0,
            },
        );
        self.logger.info(format!("Code issued for {}", msg.subject));
        code
    }
}

impl<B: CodeBackend> Handler<VerifyCode> for CodeStore<B> {
    type Result = MessageResult<VerifyCode>;

    fn handle(&mut self, msg: VerifyCode, _ctx: &mut Self::Context) -> Self::Result {
        let now = Instant::now();
        let outcome = match self.backend.entry_mut(&msg.subject) {
            None => Outcome::Missing,
            Some(entry) if entry.expires_at <= now => Outcome::Expired,
            Some(entry) if entry.code == msg.code => Outcome::Matched,
            Some(entry) => {
                entry.attempts += 1;
                if entry.attempts >= CODE_MAX_ATTEMPTS {
                    Outcome::Exhausted
                } else {
                    Outcome::Mismatch {
                        remaining: CODE_MAX_ATTEMPTS - entry.attempts,
                    }
                }
            }
        };

        let result = match outcome {
            Outcome::Missing => Err(CodeError::NotFound),
            Outcome::Expired => {
                self.backend.remove(&msg.subject);
                Err(CodeError::Expired)
            }
            Outcome::Matched => {
                // One-time use: a matched code is gone.
                self.backend.remove(&msg.subject);
                self.logger
                    .info(format!("Code verified for {}", msg.subject));
                Ok(())
            }
            Outcome::Mismatch { remaining } => {
                self.logger.warn(format!(
                    "Wrong code for {}, {remaining} attempt(s) left",
                    msg.subject
                ));
                Err(CodeError::Mismatch { remaining })
            }
            Outcome::Exhausted => {
                self.backend.remove(&msg.subject);
                self.logger
                    .warn(format!("Code for {} burned after too many attempts", msg.subject));
                Err(CodeError::MaxAttemptsExceeded)
            }
        };
        MessageResult(result)
    }
}
