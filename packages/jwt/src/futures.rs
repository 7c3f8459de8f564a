//! Future returned by the async read facade

use crate::error::{JwtError, Result};
use crate::token::Jwt;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Resolves to the outcome of a token read running on the blocking pool
pub struct ReadTokenFuture {
    rx: oneshot::Receiver<Result<Jwt>>,
}

impl ReadTokenFuture {
    pub(crate) fn new(rx: oneshot::Receiver<Result<Jwt>>) -> Self {
        Self { rx }
    }
}

impl Future for ReadTokenFuture {
    type Output = Result<Jwt>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwtError::TaskFailed)),
            Poll::Pending => Poll::Pending,
        }
    }
}
