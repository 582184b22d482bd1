/// Destination for engine diagnostics.
///
/// The engine holds no global logger: each connection owns one sink,
/// injected at open through [`StoreOptionsBuilder`](crate::StoreOptionsBuilder).
/// Embedders route `log` to their console output and `error` to their error
/// output; the engine writes every surfaced error to `error` before raising
/// it, so the original cause is not lost if a later failure preempts it.
pub trait LogSink {
    fn log(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink: forwards to the `tracing` facade.
///
/// Embedders that install a `tracing` subscriber get structured output under
/// the `record_store` target; everyone else pays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "record_store", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "record_store", "{message}");
    }
}
