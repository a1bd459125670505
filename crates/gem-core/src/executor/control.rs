//! Cancelación y presupuesto de tiempo para ejecuciones largas.
//!
//! El token de cancelación lo aporta el caller y se enhebra por cada llamada
//! al ejecutor, de modo que una orquestación puede abortarse entre
//! condiciones de prueba sin filtrar el pool de workers. El deadline acota
//! la ejecución completa; al expirar, la orquestación se abandona sin
//! materializar artefactos parciales.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::ExecutorError;

/// Token de cancelación compartible entre hilos.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Instante límite opcional para una ejecución.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn none() -> Self {
        Deadline { at: None }
    }

    pub fn after(budget: Duration) -> Self {
        Deadline { at: Some(Instant::now() + budget) }
    }

    pub fn expired(&self) -> bool {
        match self.at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }
}

/// Control de ejecución que viaja por cada llamada al ejecutor.
#[derive(Debug, Clone)]
pub struct RunControl {
    pub cancel: CancelToken,
    pub deadline: Deadline,
}

impl RunControl {
    /// Sin cancelación externa ni límite de tiempo (tests y demos).
    pub fn unbounded() -> Self {
        RunControl { cancel: CancelToken::new(),
                     deadline: Deadline::none() }
    }

    pub fn new(cancel: CancelToken, deadline: Deadline) -> Self {
        RunControl { cancel, deadline }
    }

    /// Punto de control: falla si el caller canceló o el presupuesto expiró.
    pub fn checkpoint(&self) -> Result<(), ExecutorError> {
        if self.cancel.is_cancelled() {
            return Err(ExecutorError::Cancelled);
        }
        if self.deadline.expired() {
            return Err(ExecutorError::DeadlineExceeded);
        }
        Ok(())
    }
}
