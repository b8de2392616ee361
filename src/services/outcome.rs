use crate::error::AppError;

/// Result of a read (or best-effort write) that never fails outright.
///
/// `Degraded` carries the fallback value the caller should render together
/// with the reason the real value could not be produced, so the failure path
/// can be inspected without scraping logs.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Loaded(T),
    Degraded { fallback: T, reason: String },
}

impl<T> Outcome<T> {
    /// Logs `err` against `operation` and wraps `fallback`.
    pub fn degraded(operation: &str, fallback: T, err: AppError) -> Self {
        tracing::warn!(operation, error = %err, "Store call degraded, serving fallback");
        Outcome::Degraded {
            fallback,
            reason: err.to_string(),
        }
    }

    pub fn from_result(operation: &str, result: Result<T, AppError>, fallback: T) -> Self {
        match result {
            Ok(value) => Outcome::Loaded(value),
            Err(err) => Outcome::degraded(operation, fallback, err),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Loaded(_) => None,
            Outcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Loaded(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Loaded(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Loaded(value) => Outcome::Loaded(f(value)),
            Outcome::Degraded { fallback, reason } => Outcome::Degraded {
                fallback: f(fallback),
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn degraded_keeps_fallback_and_reason() {
        let outcome: Outcome<Vec<u8>> = Outcome::from_result(
            "list",
            Err(AppError::InternalError("boom".to_string())),
            Vec::new(),
        );

        assert!(outcome.is_degraded());
        assert_eq!(outcome.reason(), Some("Internal error: boom"));
        assert!(outcome.into_value().is_empty());
    }

    #[test]
    fn map_preserves_variant() {
        let loaded = Outcome::Loaded(2).map(|n| n * 10);
        assert_eq!(loaded, Outcome::Loaded(20));
    }

    #[test]
    fn degraded_log_names_the_operation() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            Outcome::degraded(
                "save_settings",
                false,
                AppError::InternalError("boom".to_string()),
            );
        });

        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("save_settings"), "{}", log);
        assert!(log.contains("Store call degraded"), "{}", log);
        assert!(!log.contains("catalog read"), "{}", log);
    }
}
