use crate::browser::driver::{PageDriver, SessionFactory};
use crate::error::AuditError;

/// A set of isolated browser sessions created up front for the workers.
///
/// Session creation is allowed to partially fail: a machine under memory
/// pressure may refuse the fourth browser while three are fine, and three
/// workers are better than an aborted run. Zero sessions is fatal.
pub struct SessionPool {
    sessions: Vec<Box<dyn PageDriver>>,
}

impl SessionPool {
    pub fn build(factory: &dyn SessionFactory, size: usize) -> Result<Self, AuditError> {
        let mut sessions = Vec::with_capacity(size);
        for i in 0..size {
            match factory.create() {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    eprintln!("warning: session {} of {} failed to start: {}", i + 1, size, e);
                }
            }
        }
        if sessions.is_empty() {
            return Err(AuditError::PoolExhausted(format!(
                "all {} session launches failed",
                size
            )));
        }
        Ok(Self { sessions })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn into_sessions(self) -> Vec<Box<dyn PageDriver>> {
        self.sessions
    }
}
