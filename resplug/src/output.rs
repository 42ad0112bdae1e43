//! Asynchronously resolved values
//!
//! An `Output<T>` is handed out as soon as a resource is declared. Its value
//! arrives later, once the resource monitor answers the registration. Outputs
//! are resolved exactly once through their `OutputResolver<T>`.

use crate::error::{ResplugError, Result};
use crate::types::Dynamic;
use serde::de::DeserializeOwned;
use std::fmt;
use tokio::sync::watch;

#[derive(Clone)]
enum Resolution<T> {
    Pending,
    Resolved {
        value: Option<T>,
        known: bool,
        secret: bool,
    },
    Rejected(String),
}

/// Settled state of an output: the value (absent when unknown or null),
/// whether it is known, and whether it is secret
pub(crate) struct Settled<T> {
    pub value: Option<T>,
    pub known: bool,
    pub secret: bool,
}

/// Output is a cloneable handle to a value the runtime resolves later
pub struct Output<T> {
    rx: watch::Receiver<Resolution<T>>,
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.rx.borrow() {
            Resolution::Pending => "pending",
            Resolution::Resolved { secret: true, .. } => "secret",
            Resolution::Resolved { known: false, .. } => "unknown",
            Resolution::Resolved { .. } => "resolved",
            Resolution::Rejected(_) => "rejected",
        };
        write!(f, "Output({})", state)
    }
}

/// OutputResolver settles the matching Output exactly once
pub struct OutputResolver<T> {
    tx: watch::Sender<Resolution<T>>,
}

impl<T> Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an unresolved output and its resolver
    pub fn pending() -> (Output<T>, OutputResolver<T>) {
        let (tx, rx) = watch::channel(Resolution::Pending);
        (Output { rx }, OutputResolver { tx })
    }

    /// An output that is already known
    pub fn known(value: T) -> Self {
        Self::settled(Some(value), true, false)
    }

    /// An output that is already known and marked secret
    pub fn secret(value: T) -> Self {
        Self::settled(Some(value), true, true)
    }

    /// An output whose value will never be known (preview)
    pub fn unknown() -> Self {
        Self::settled(None, false, false)
    }

    fn settled(value: Option<T>, known: bool, secret: bool) -> Self {
        let (_tx, rx) = watch::channel(Resolution::Resolved {
            value,
            known,
            secret,
        });
        Output { rx }
    }

    /// Wait for the value; `None` when the value is unknown or absent
    pub async fn value(&self) -> Result<Option<T>> {
        Ok(self.settle().await?.value)
    }

    pub async fn is_known(&self) -> Result<bool> {
        Ok(self.settle().await?.known)
    }

    pub async fn is_secret(&self) -> Result<bool> {
        Ok(self.settle().await?.secret)
    }

    /// Map the eventual value, keeping secretness and unknownness
    pub fn apply<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let (output, resolver) = Output::pending();
        let source = self.clone();
        tokio::spawn(async move {
            match source.settle().await {
                Ok(settled) => {
                    let value = settled.value.map(f);
                    resolver.resolve(value, settled.known, settled.secret);
                }
                Err(e) => resolver.reject(e.to_string()),
            }
        });
        output
    }

    /// Same value, marked secret
    pub fn into_secret(self) -> Output<T> {
        let (output, resolver) = Output::pending();
        tokio::spawn(async move {
            match self.settle().await {
                Ok(settled) => resolver.resolve(settled.value, settled.known, true),
                Err(e) => resolver.reject(e.to_string()),
            }
        });
        output
    }

    /// Combine outputs; the result is known only when every input is
    pub fn all(outputs: Vec<Output<T>>) -> Output<Vec<T>> {
        let (output, resolver) = Output::pending();
        tokio::spawn(async move {
            let settled = futures::future::join_all(outputs.iter().map(Output::settle)).await;

            let mut values = Vec::with_capacity(settled.len());
            let mut known = true;
            let mut secret = false;
            for item in settled {
                match item {
                    Ok(s) => {
                        known &= s.known;
                        secret |= s.secret;
                        if let Some(value) = s.value {
                            values.push(value);
                        }
                    }
                    Err(e) => {
                        resolver.reject(e.to_string());
                        return;
                    }
                }
            }

            let value = if known { Some(values) } else { None };
            resolver.resolve(value, known, secret);
        });
        output
    }

    pub(crate) async fn settle(&self) -> Result<Settled<T>> {
        let mut rx = self.rx.clone();
        loop {
            {
                let current = rx.borrow_and_update();
                match &*current {
                    Resolution::Pending => {}
                    Resolution::Resolved {
                        value,
                        known,
                        secret,
                    } => {
                        return Ok(Settled {
                            value: value.clone(),
                            known: *known,
                            secret: *secret,
                        })
                    }
                    Resolution::Rejected(message) => {
                        return Err(ResplugError::OutputRejected(message.clone()))
                    }
                }
            }

            if rx.changed().await.is_err() && matches!(*rx.borrow(), Resolution::Pending) {
                return Err(ResplugError::OutputDropped);
            }
        }
    }
}

impl<T> OutputResolver<T> {
    pub fn resolve(&self, value: Option<T>, known: bool, secret: bool) {
        self.tx.send_replace(Resolution::Resolved {
            value,
            known,
            secret,
        });
    }

    pub fn reject(&self, message: impl Into<String>) {
        self.tx.send_replace(Resolution::Rejected(message.into()));
    }
}

/// Type-erased resolver, filled from a property returned by the monitor
pub trait DynamicResolver: Send + Sync {
    /// Resolve from the raw property; `force_secret` marks the value secret
    /// even if the monitor returned it in plaintext
    fn resolve_dynamic(&self, value: Option<&Dynamic>, force_secret: bool);

    fn reject_dynamic(&self, message: &str);
}

impl<T> DynamicResolver for OutputResolver<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn resolve_dynamic(&self, value: Option<&Dynamic>, force_secret: bool) {
        let value = match value {
            None | Some(Dynamic::Null) => {
                self.resolve(None, true, force_secret);
                return;
            }
            Some(value) => value,
        };

        let secret = force_secret || value.contains_secrets();
        if value.contains_unknowns() {
            self.resolve(None, false, secret);
            return;
        }

        match value.deserialize_into::<T>() {
            Ok(typed) => self.resolve(Some(typed), true, secret),
            Err(e) => self.reject(e.to_string()),
        }
    }

    fn reject_dynamic(&self, message: &str) {
        self.reject(message);
    }
}
