//! Request handlers.
//!
//! Handlers stay thin: they translate HTTP into engine calls and map
//! domain errors via [`AppError`](crate::error::AppError).

pub mod detect;
