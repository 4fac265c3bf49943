//! Runtime core: the notification lifecycle.
//!
//! This module contains the embedded implementation of the notifier runtime.
//! The public API from this module is [`Notifier`] (with its builder and
//! [`Subscription`] ticket) plus [`Ingress`], the restricted handle sources
//! use to push signals in.
//!
//! Internal modules:
//! - [`command`]: the serialized command queue feeding the actor;
//! - [`actor`]: owns the active set, timers, and observer fan-out;
//! - [`notifier`]: public handle, builder, and subscription ticket.

mod actor;
mod notifier;

pub(crate) mod command;

pub use command::Ingress;
pub use notifier::{Notifier, NotifierBuilder, Subscription};
