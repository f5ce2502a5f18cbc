//! # Ambient channels
//!
//! A [`Channel<C>`] carries a value down the composition without threading it
//! through every component's arguments. Publication is tree‑scoped: a value
//! handed to [`provide`] is visible to everything composed inside the closure
//! and disappears again when the closure returns.
//!
//! ```rust
//! use tether_core::*;
//!
//! let accent = Channel::with_default("accent", "green");
//!
//! assert_eq!(accent.fetch(), Some("green"));
//! provide(&accent, "orange", || {
//!     assert_eq!(accent.fetch(), Some("orange"));
//! });
//! assert_eq!(accent.fetch(), Some("green"));
//! ```
//!
//! Lookups walk the scope chain from the innermost publication outwards, so
//! the nearest enclosing `provide` wins. A channel without a default reports
//! `None` ("unset") when nothing encloses the read.

use std::any::Any;
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

pub type ChannelId = u64;

struct Publication {
    channel: ChannelId,
    value: Rc<dyn Any>,
}

thread_local! {
    static SCOPE_CHAIN: RefCell<SmallVec<[Publication; 8]>> = RefCell::new(SmallVec::new());
    static NEXT_CHANNEL_ID: Cell<ChannelId> = const { Cell::new(1) };
}

fn next_channel_id() -> ChannelId {
    NEXT_CHANNEL_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    })
}

/// Handle to a broadcast slot. Cloning shares the slot.
pub struct Channel<C: 'static> {
    inner: Rc<ChannelInner<C>>,
}

struct ChannelInner<C> {
    id: ChannelId,
    name: Cow<'static, str>,
    default: Option<C>,
}

impl<C: 'static> Channel<C> {
    /// Creates a channel with an optional default, returned by `fetch` when no
    /// publication encloses the read.
    pub fn new(name: impl Into<Cow<'static, str>>, default: Option<C>) -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                id: next_channel_id(),
                name: name.into(),
                default,
            }),
        }
    }

    pub fn with_default(name: impl Into<Cow<'static, str>>, default: C) -> Self {
        Self::new(name, Some(default))
    }

    /// Channel whose unpublished state is "unset".
    pub fn unset(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, None)
    }

    pub fn id(&self) -> ChannelId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether some enclosing `provide` currently publishes on this channel.
    pub fn is_provided(&self) -> bool {
        SCOPE_CHAIN.with(|chain| chain.borrow().iter().any(|p| p.channel == self.inner.id))
    }

    /// Nearest published value, else the default, else `None`.
    ///
    /// The value is cloned after the scope chain is released, so `C::clone`
    /// may itself publish or fetch.
    pub fn fetch(&self) -> Option<C>
    where
        C: Clone,
    {
        let published = SCOPE_CHAIN.with(|chain| {
            chain
                .borrow()
                .iter()
                .rev()
                .find(|p| p.channel == self.inner.id)
                .map(|p| p.value.clone())
        });
        match published.map(|v| v.downcast::<C>()) {
            Some(Ok(v)) => Some((*v).clone()),
            _ => self.inner.default.clone(),
        }
    }
}

impl<C: 'static> Clone for Channel<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: 'static> fmt::Debug for Channel<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("has_default", &self.inner.default.is_some())
            .finish()
    }
}

/// Publishes `value` on `channel` for everything composed inside `f`.
pub fn provide<C: 'static, R>(channel: &Channel<C>, value: C, f: impl FnOnce() -> R) -> R {
    // pops on unwind too
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            SCOPE_CHAIN.with(|chain| {
                chain.borrow_mut().pop();
            });
        }
    }

    log::trace!(
        "channel '{}' (#{}) published at depth {}",
        channel.name(),
        channel.id(),
        depth()
    );
    SCOPE_CHAIN.with(|chain| {
        chain.borrow_mut().push(Publication {
            channel: channel.id(),
            value: Rc::new(value),
        })
    });
    let _guard = Guard;
    f()
}

/// Number of publications enclosing the caller.
pub fn depth() -> usize {
    SCOPE_CHAIN.with(|chain| chain.borrow().len())
}
