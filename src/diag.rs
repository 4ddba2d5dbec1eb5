//! Injected diagnostics sink.
//!
//! The readers and resolvers never write to a console or logger directly;
//! every failure is handed to a [`Diagnostics`] implementation chosen by the
//! caller. [`LogDiagnostics`] forwards to the `log` facade,
//! [`NullDiagnostics`] swallows everything.

use crate::error::XmlError;

/// Receiver for parse and query failures.
///
/// Implementations must not panic; the error is also propagated (or turned
/// into a "not found" result) through the normal return path, the sink is
/// observation only.
pub trait Diagnostics {
    fn report(&self, err: &XmlError);
}

/// Forwards diagnostics to the `log` crate at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, err: &XmlError) {
        log::error!("{err}");
    }
}

/// Build an error, hand it to the sink, and return it for propagation.
pub(crate) fn report(
    diag: &dyn Diagnostics,
    kind: crate::error::ErrorKind,
    message: &'static str,
    position: usize,
) -> XmlError {
    let err = XmlError::at(kind, message, position);
    diag.report(&err);
    err
}

/// Discards all diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&self, _err: &XmlError) {}
}
