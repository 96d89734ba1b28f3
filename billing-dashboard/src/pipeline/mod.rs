use std::{pin::Pin, sync::Arc};

use billing_core::BillingError;
use futures::{Stream, StreamExt};

/// One input row plus its zero-based position in the input.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub payload: T,
    pub index: usize,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(String),
    #[error(transparent)]
    Billing(#[from] BillingError),
}

pub type EnvelopeStream<T> = Pin<Box<dyn Stream<Item = Result<Envelope<T>, PipelineError>> + Send>>;

#[async_trait::async_trait]
pub trait Source<T>: Send + Sync {
    async fn stream(&self) -> EnvelopeStream<T>;
}

#[async_trait::async_trait]
pub trait Transform<I, O>: Send + Sync {
    async fn apply(&self, input: Envelope<I>) -> Result<Envelope<O>, PipelineError>;
}

#[async_trait::async_trait]
pub trait Sink<T>: Send + Sync {
    type Output: Send;

    async fn run<S>(&self, input: S) -> Result<Self::Output, PipelineError>
    where
        S: Stream<Item = Result<Envelope<T>, PipelineError>> + Send + Unpin + 'static;
}

/// A single pass: rows flow from `source` through `transforms` into `sink`.
pub struct Pipeline<S, T, K> {
    pub source: S,
    pub transforms: Vec<Arc<dyn Transform<T, T> + Send + Sync>>, // same-type transforms chain
    pub sink: K,
}

impl<T, S, K> Pipeline<S, T, K>
where
    T: Send + 'static,
    S: Source<T> + Send + Sync + 'static,
    K: Sink<T> + Send + Sync + 'static,
{
    pub async fn run(self) -> Result<K::Output, PipelineError> {
        let mut stream = self.source.stream().await;

        for transform in self.transforms {
            stream = Box::pin(stream.then(move |item| {
                let transform = transform.clone();
                async move { transform.apply(item?).await }
            }));
        }

        self.sink.run(stream).await
    }
}
