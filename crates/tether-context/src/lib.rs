//! # Generated contexts
//!
//! Wiring a shared value through a subtree by hand means creating a
//! [`Channel`], a wrapper component that computes and publishes the value, and
//! a reader that checks whether the wrapper is actually there. This crate
//! generates the pair from one derivation function:
//!
//! ```rust
//! use tether_context::*;
//! use tether_core::*;
//!
//! struct Props {
//!     name: &'static str,
//! }
//!
//! let (provider, reader) = generate_context(
//!     |p: &Props| format!("hello, {}", p.name),
//!     ContextConfig::default(),
//! );
//!
//! let mut composition = Composition::new();
//! let view = composition
//!     .compose(|| {
//!         provider.view(Props { name: "tether" }, || {
//!             Text(reader.use_context().unwrap_or_default())
//!         })
//!     })
//!     .unwrap();
//! assert!(view.has_text("hello, tether"));
//! ```
//!
//! The derivation runs inside the provider's slot of the composition on every
//! pass, so it may `remember` state and hand out handlers that change it.
//!
//! ## Missing providers
//!
//! A reader composed outside any provider fetches the configured default. When
//! there is no default either, the channel is unset and the reader's policy
//! decides:
//!
//! - `require_provider(true)` (the default): [`ContextReader::read`] returns
//!   [`MissingProviderError`] with the configured message.
//! - `require_provider(false)`: `read` returns `Ok(None)`.
//!
//! [`ContextReader::use_context`] is the in-component form. It reports the
//! error to the running composition, which then fails the pass, and gives the
//! component `None` to render nothing with.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tether_core::{Channel, View, provide, report_error};


pub const DEFAULT_MISSING_PROVIDER_MESSAGE: &str = "this context must be read inside its Provider";

/// A reader ran with no enclosing provider, no default, and a policy that
/// requires one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MissingProviderError {
    message: Cow<'static, str>,
}

impl MissingProviderError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Options read once by [`generate_context`].
#[derive(Clone)]
pub struct ContextConfig<C> {
    default_context: Option<C>,
    require_provider: bool,
    missing_provider_message: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl<C> Default for ContextConfig<C> {
    fn default() -> Self {
        Self {
            default_context: None,
            require_provider: true,
            missing_provider_message: Cow::Borrowed(DEFAULT_MISSING_PROVIDER_MESSAGE),
            name: Cow::Borrowed("context"),
        }
    }
}

impl<C> ContextConfig<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value readers see when no provider encloses them.
    pub fn default_context(mut self, value: C) -> Self {
        self.default_context = Some(value);
        self
    }

    pub fn require_provider(mut self, require: bool) -> Self {
        self.require_provider = require;
        self
    }

    pub fn missing_provider_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.missing_provider_message = message.into();
        self
    }

    /// Name used in log lines and `Debug` output.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<C> fmt::Debug for ContextConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextConfig")
            .field("name", &self.name)
            .field("has_default", &self.default_context.is_some())
            .field("require_provider", &self.require_provider)
            .field("missing_provider_message", &self.missing_provider_message)
            .finish()
    }
}

/// Wrapper component: derives a value from its props on every render and
/// publishes it to the subtree it wraps.
pub struct ContextProvider<P: 'static, C: 'static> {
    channel: Channel<C>,
    derive: Rc<dyn Fn(&P) -> C>,
}

impl<P: 'static, C: 'static> ContextProvider<P, C> {
    pub fn provide<R>(&self, props: &P, children: impl FnOnce() -> R) -> R {
        let value = (self.derive)(props);
        log::debug!("provider '{}' publishing a fresh value", self.channel.name());
        provide(&self.channel, value, children)
    }

    pub fn view(&self, props: P, children: impl FnOnce() -> View) -> View {
        self.provide(&props, children)
    }
}

impl<P: 'static, C: 'static> Clone for ContextProvider<P, C> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            derive: self.derive.clone(),
        }
    }
}

impl<P: 'static, C: 'static> fmt::Debug for ContextProvider<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextProvider")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

struct ReaderPolicy {
    require_provider: bool,
    missing_provider_message: Cow<'static, str>,
}

/// Reads the value published by the nearest enclosing [`ContextProvider`].
pub struct ContextReader<C: 'static> {
    channel: Channel<C>,
    policy: Rc<ReaderPolicy>,
}

impl<C: Clone + 'static> ContextReader<C> {
    /// Nearest provider's value, else the default. `Ok(None)` only when the
    /// channel is unset and the policy does not require a provider.
    pub fn read(&self) -> Result<Option<C>, MissingProviderError> {
        match self.channel.fetch() {
            Some(value) => Ok(Some(value)),
            None if self.policy.require_provider => {
                log::debug!("reader of '{}' has no provider", self.channel.name());
                Err(MissingProviderError {
                    message: self.policy.missing_provider_message.clone(),
                })
            }
            None => Ok(None),
        }
    }

    /// Raw fetch, ignoring the policy.
    pub fn try_read(&self) -> Option<C> {
        self.channel.fetch()
    }

    /// Reads inside a component. A policy violation is reported to the
    /// running composition and `None` is returned.
    pub fn use_context(&self) -> Option<C> {
        match self.read() {
            Ok(value) => value,
            Err(e) => {
                report_error(e);
                None
            }
        }
    }
}

impl<C: 'static> ContextReader<C> {
    pub fn is_provided(&self) -> bool {
        self.channel.is_provided()
    }
}

impl<C: 'static> Clone for ContextReader<C> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<C: 'static> fmt::Debug for ContextReader<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextReader")
            .field("channel", &self.channel)
            .field("require_provider", &self.policy.require_provider)
            .finish()
    }
}

/// Creates a fresh channel and the provider/reader pair bound to it.
pub fn generate_context<P, C>(
    derive: impl Fn(&P) -> C + 'static,
    config: ContextConfig<C>,
) -> (ContextProvider<P, C>, ContextReader<C>)
where
    P: 'static,
    C: 'static,
{
    let ContextConfig {
        default_context,
        require_provider,
        missing_provider_message,
        name,
    } = config;

    let channel = Channel::new(name, default_context);
    let provider = ContextProvider {
        channel: channel.clone(),
        derive: Rc::new(derive),
    };
    let reader = ContextReader {
        channel,
        policy: Rc::new(ReaderPolicy {
            require_provider,
            missing_provider_message,
        }),
    };
    (provider, reader)
}

/// [`generate_context`] with only a default value configured.
pub fn generate_context_with_default<P, C>(
    derive: impl Fn(&P) -> C + 'static,
    default: C,
) -> (ContextProvider<P, C>, ContextReader<C>)
where
    P: 'static,
    C: 'static,
{
    generate_context(derive, ContextConfig::new().default_context(default))
}
