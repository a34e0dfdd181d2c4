use std::future::IntoFuture;

use kernel::KernelError;

use crate::error::ErrorStatus;

/// Turns a wire request (plus whatever the extractors resolved) into a DTO.
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Turns a service result into something axum can respond with.
pub trait Exhaust<O>: 'static + Sync + Send {
    type To;
    fn emit(&self, output: O) -> Self::To;
}

/// Request pipeline: transformer, then service call, then presenter.
/// Service failures become [`ErrorStatus`].
pub struct Controller<T, P> {
    transformer: T,
    presenter: P,
}

impl<T, P> Controller<T, P> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
        }
    }

    pub fn intake<I>(self, input: I) -> Transformed<T::To, P>
    where
        T: Intake<I>,
    {
        Transformed {
            transformed: self.transformer.emit(input),
            presenter: self.presenter,
        }
    }
}

impl<P> Controller<(), P> {
    /// Calls a service that takes no request input.
    pub async fn bypass<F, Fut, O>(self, f: F) -> Result<P::To, ErrorStatus>
    where
        P: Exhaust<O>,
        F: FnOnce() -> Fut,
        Fut: IntoFuture<Output = error_stack::Result<O, KernelError>>,
    {
        let output = f().await?;
        Ok(self.presenter.emit(output))
    }
}

pub struct Transformed<D, P> {
    transformed: D,
    presenter: P,
}

impl<D, P> Transformed<D, P> {
    pub async fn handle<F, Fut, O>(self, f: F) -> Result<P::To, ErrorStatus>
    where
        P: Exhaust<O>,
        F: FnOnce(D) -> Fut,
        Fut: IntoFuture<Output = error_stack::Result<O, KernelError>>,
    {
        let output = f(self.transformed).await?;
        Ok(self.presenter.emit(output))
    }
}
