//! # Interception Engine
//!
//! Attaches behavior to call sites of the host application. A hook is
//! registered against an [`InterceptionPoint`] in one of three modes:
//!
//! - `ObserveBefore`: the handler runs before the original method and
//!   can neither prevent nor alter the call.
//! - `ObserveAfter`: the handler runs once the original has returned
//!   and sees a copy of its result; the caller always receives the
//!   original result.
//! - `Replace`: the handler runs instead of the original method and its
//!   result slot is delivered to the caller.
//!
//! Handlers run synchronously on whichever thread the host used to
//! invoke the call site. Errors and panics raised inside a handler are
//! contained at the dispatch boundary and logged; they never reach the
//! host's call stack.

pub mod engine;
pub mod locator;
pub mod types;

pub use engine::InterceptionEngine;
pub use types::{Handler, HookMode, InterceptionPoint, MethodCall, RegistrationHandle};
