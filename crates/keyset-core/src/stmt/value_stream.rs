use super::*;

use std::{
    collections::VecDeque,
    fmt, mem,
    pin::Pin,
    task::{Context, Poll},
};
use tokio_stream::{Stream, StreamExt};

/// Rows returned by a driver, either fully buffered or produced lazily.
#[derive(Default)]
pub struct ValueStream {
    buffer: Buffer,
    stream: Option<DynStream>,
}

#[derive(Debug)]
struct Iter<I> {
    iter: I,
}

#[derive(Clone, Default, PartialEq)]
enum Buffer {
    #[default]
    Empty,
    One(Value),
    Many(VecDeque<Value>),
}

type DynStream = Pin<Box<dyn Stream<Item = crate::Result<Value>> + Send + 'static>>;

impl ValueStream {
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self {
            buffer: Buffer::One(value.into()),
            stream: None,
        }
    }

    pub fn from_stream<T: Stream<Item = crate::Result<Value>> + Send + 'static>(stream: T) -> Self {
        Self {
            buffer: Buffer::Empty,
            stream: Some(Box::pin(stream)),
        }
    }

    pub fn from_vec(records: Vec<Value>) -> Self {
        Self {
            buffer: Buffer::Many(records.into()),
            stream: None,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<T, I>(iter: I) -> Self
    where
        T: Into<Value>,
        I: Iterator<Item = crate::Result<T>> + Send + 'static,
    {
        Self::from_stream(Iter { iter })
    }

    /// Returns the next record in the stream
    pub async fn next(&mut self) -> Option<crate::Result<Value>> {
        StreamExt::next(self).await
    }

    /// The stream will contain at least this number of elements
    pub fn min_len(&self) -> usize {
        let (ret, _) = self.size_hint();
        ret
    }

    pub async fn collect(mut self) -> crate::Result<Vec<Value>> {
        let mut ret = Vec::with_capacity(self.min_len());

        while let Some(res) = self.next().await {
            ret.push(res?);
        }

        Ok(ret)
    }

    /// Drains the stream into records, failing if any item is not a record.
    pub async fn collect_records(self) -> crate::Result<Vec<ValueRecord>> {
        self.collect()
            .await?
            .into_iter()
            .map(|value| match value {
                Value::Record(record) => Ok(record),
                value => Err(crate::Error::invalid_result(format!(
                    "expected record, got {value:?}"
                ))),
            })
            .collect()
    }

    /// Buffers the remainder of the stream and returns a copy of it, leaving
    /// `self` able to yield the same values.
    pub async fn dup(&mut self) -> crate::Result<Self> {
        self.buffer().await?;

        Ok(Self {
            buffer: self.buffer.clone(),
            stream: None,
        })
    }

    pub async fn buffer(&mut self) -> crate::Result<()> {
        if let Some(mut stream) = self.stream.take() {
            while let Some(res) = stream.next().await {
                let value = res?;
                self.buffer.push(value);
            }
        }

        Ok(())
    }

    // NOTE: this method is only used for testing purposes.
    #[cfg(test)]
    fn into_inner(self) -> (Buffer, Option<DynStream>) {
        (self.buffer, self.stream)
    }
}

impl Stream for ValueStream {
    type Item = crate::Result<Value>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(next) = self.buffer.next() {
            Poll::Ready(Some(Ok(next)))
        } else if let Some(stream) = self.stream.as_mut() {
            Pin::new(stream).poll_next(cx)
        } else {
            Poll::Ready(None)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (mut low, mut high) = match &self.stream {
            Some(stream) => stream.size_hint(),
            None => (0, Some(0)),
        };

        let buffered = self.buffer.len();

        low += buffered;

        if let Some(high) = high.as_mut() {
            *high += buffered;
        }

        (low, high)
    }
}

impl From<Value> for ValueStream {
    fn from(src: Value) -> Self {
        Self::from_value(src)
    }
}

impl From<Vec<Value>> for ValueStream {
    fn from(value: Vec<Value>) -> Self {
        Self::from_vec(value)
    }
}

impl From<Vec<ValueRecord>> for ValueStream {
    fn from(records: Vec<ValueRecord>) -> Self {
        Self::from_vec(records.into_iter().map(Value::Record).collect())
    }
}

impl<I> Unpin for Iter<I> {}

impl<T, I> Stream for Iter<I>
where
    I: Iterator<Item = crate::Result<T>>,
    T: Into<Value>,
{
    type Item = crate::Result<Value>;

    fn poll_next(mut self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.iter.next().map(|res| res.map(|item| item.into())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl fmt::Debug for ValueStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueStream")
            .field("buffered", &self.buffer.len())
            .field("streaming", &self.stream.is_some())
            .finish()
    }
}

impl Buffer {
    fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Many(v) => v.len(),
        }
    }

    fn next(&mut self) -> Option<Value> {
        match self {
            Self::Empty => None,
            Self::One(_) => match mem::take(self) {
                Self::One(value) => Some(value),
                _ => None,
            },
            Self::Many(values) => values.pop_front(),
        }
    }

    fn push(&mut self, value: Value) {
        match mem::take(self) {
            Self::Empty => *self = Self::One(value),
            Self::One(first) => *self = Self::Many(VecDeque::from([first, value])),
            Self::Many(mut values) => {
                values.push_back(value);
                *self = Self::Many(values);
            }
        }
    }
}
