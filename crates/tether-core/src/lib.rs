//! # Composition, Channels, and Signals
//!
//! Tether is a small headless UI runtime. Components are plain functions that
//! return a [`View`]; a [`Composition`] runs them once per pass and keeps
//! whatever they `remember` between passes. There are three main pieces:
//!
//! - `remember*` — lifecycle‑aware storage bound to a composition.
//! - `Signal<T>` — observable value; `remember_signal` ties its writes to the
//!   owning composition's dirty flag.
//! - `Channel<C>` — tree‑scoped ambient value, published with [`provide`] and
//!   read with [`Channel::fetch`] from anywhere below the publication.
//!
//! ## Remembered state
//!
//! ```rust
//! use tether_core::*;
//!
//! fn Counter() -> View {
//!     let count = remember_signal(|| 0);
//!     let inc = count.clone();
//!     Column(vec![
//!         Text(count.get().to_string()),
//!         Button("+", move || inc.update(|v| *v += 1)),
//!     ])
//! }
//!
//! let mut composition = Composition::new();
//! let view = composition.compose(Counter).unwrap();
//! assert!(view.has_text("0"));
//! ```
//!
//! - `remember` and `remember_state` are order‑based: the Nth call in a
//!   composition pass always refers to the Nth stored value.
//! - `remember_with_key` is key‑based and more
//!   stable across conditional branches.
//!
//! ## Errors
//!
//! Components never unwind to report a problem. They hand it to
//! [`report_error`], the pass finishes, and [`Composition::compose`] returns
//! the first reported error as [`ComposeError::Component`].
//!
//! For driving a tree in tests, see [`testing::TestRenderer`].

pub mod channel;
pub mod error;
pub mod runtime;
pub mod signal;
pub mod testing;
pub mod view;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use channel::*;
pub use error::*;
pub use runtime::*;
pub use signal::*;
pub use view::*;
pub use widgets::*;
