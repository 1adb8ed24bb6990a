use std::{sync::Arc, time::SystemTime};

use crate::config::ConfigError;

#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub payload: T,
    pub received_at: SystemTime,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            received_at: SystemTime::now(),
        }
    }

    /// Replace the payload, keeping the original receive time.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            payload: f(self.payload),
            received_at: self.received_at,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl IngestError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::Persistence(_) => "persistence",
            Self::Configuration(_) => "configuration",
        }
    }
}

#[async_trait::async_trait]
pub trait Source<T>: Send + Sync {
    async fn fetch(&self) -> Result<Envelope<T>, IngestError>;
}

#[async_trait::async_trait]
pub trait Transform<I, O>: Send + Sync {
    async fn apply(&self, input: Envelope<I>) -> Result<Envelope<O>, IngestError>;
}

#[async_trait::async_trait]
pub trait Sink<T>: Send + Sync {
    async fn put(&self, input: &Envelope<T>) -> Result<(), IngestError>;

    /// Where records end up, for logs.
    fn target(&self) -> String {
        "unnamed sink".to_string()
    }
}

/// One fetch, one transform, one write. Nothing is written unless the
/// source and the transform both succeed.
pub struct Pipeline<S, I, O, K> {
    pub source: S,
    pub transform: Arc<dyn Transform<I, O> + Send + Sync>,
    pub sink: K,
}

impl<S, I, O, K> Pipeline<S, I, O, K>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
    S: Source<I> + Send + Sync + 'static,
    K: Sink<O> + Send + Sync + 'static,
{
    pub async fn run_once(&self) -> Result<Envelope<O>, IngestError> {
        let fetched = self.source.fetch().await?;
        let transformed = self.transform.apply(fetched).await?;
        self.sink.put(&transformed).await?;
        Ok(transformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource(Option<u32>);

    #[async_trait::async_trait]
    impl Source<u32> for FixedSource {
        async fn fetch(&self) -> Result<Envelope<u32>, IngestError> {
            self.0
                .map(Envelope::new)
                .ok_or_else(|| IngestError::Network("unreachable".to_string()))
        }
    }

    struct Double;

    #[async_trait::async_trait]
    impl Transform<u32, u32> for Double {
        async fn apply(&self, input: Envelope<u32>) -> Result<Envelope<u32>, IngestError> {
            Ok(input.map(|v| v * 2))
        }
    }

    #[derive(Default)]
    struct CountingSink(AtomicUsize);

    #[async_trait::async_trait]
    impl Sink<u32> for CountingSink {
        async fn put(&self, _input: &Envelope<u32>) -> Result<(), IngestError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn run_once_writes_transformed_payload() {
        let pipeline = Pipeline {
            source: FixedSource(Some(21)),
            transform: Arc::new(Double),
            sink: CountingSink::default(),
        };

        let out = pipeline.run_once().await.unwrap();
        assert_eq!(out.payload, 42);
        assert_eq!(pipeline.sink.0.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.sink.target(), "unnamed sink");
    }

    #[tokio::test]
    async fn source_failure_skips_sink() {
        let pipeline = Pipeline {
            source: FixedSource(None),
            transform: Arc::new(Double),
            sink: CountingSink::default(),
        };

        let err = pipeline.run_once().await.unwrap_err();
        assert_eq!(err.kind(), "network");
        assert_eq!(pipeline.sink.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn map_keeps_receive_time() {
        let env = Envelope::new("a");
        let received_at = env.received_at;
        let mapped = env.map(str::len);
        assert_eq!(mapped.payload, 1);
        assert_eq!(mapped.received_at, received_at);
    }
}
