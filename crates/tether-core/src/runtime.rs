use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::View;
use crate::error::{BoxError, ComposeError};

thread_local! {
    static COMPOSER: RefCell<Option<Composer>> = const { RefCell::new(None) };
}

/// Slot storage of one tree instance. Installed on the thread while that
/// tree composes.
#[derive(Default)]
pub struct Composer {
    /// `None` marks a slot reserved by a `remember` whose init is still running.
    slots: Vec<Option<Box<dyn Any>>>,
    cursor: usize,
    keyed_slots: HashMap<String, Box<dyn Any>>,
    dirty: Rc<Cell<bool>>,
    errors: Vec<BoxError>,
}

impl Composer {
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn keyed_slot_count(&self) -> usize {
        self.keyed_slots.len()
    }
}

/// One tree instance: remembered state, dirty flag and the error boundary
/// for its composition passes.
#[derive(Default)]
pub struct Composition {
    composer: Option<Composer>,
    passes: u64,
}

struct ComposeGuard<'a> {
    home: &'a mut Option<Composer>,
}

impl<'a> ComposeGuard<'a> {
    fn begin(home: &'a mut Option<Composer>) -> Result<Self, ComposeError> {
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            if c.is_some() {
                return Err(ComposeError::Reentrant);
            }
            let mut composer = home.take().unwrap_or_default();
            composer.cursor = 0;
            composer.dirty.set(false);
            composer.errors.clear();
            *c = Some(composer);
            Ok(ComposeGuard { home })
        })
    }

    fn take_errors(&mut self) -> Vec<BoxError> {
        COMPOSER.with(|c| {
            c.borrow_mut()
                .as_mut()
                .map(|comp| std::mem::take(&mut comp.errors))
                .unwrap_or_default()
        })
    }
}

impl Drop for ComposeGuard<'_> {
    fn drop(&mut self) {
        *self.home = COMPOSER.with(|c| c.borrow_mut().take());
    }
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one composition pass. Errors reported by components during the
    /// pass do not abort it; the first one is returned once the pass ends.
    pub fn compose(&mut self, build: impl FnOnce() -> View) -> Result<View, ComposeError> {
        let mut guard = ComposeGuard::begin(&mut self.composer)?;
        self.passes += 1;
        log::debug!("composition pass {}", self.passes);

        let view = build();
        let mut errors = guard.take_errors().into_iter();
        drop(guard);

        match errors.next() {
            None => Ok(view),
            Some(first) => {
                for extra in errors {
                    log::warn!("additional error during composition: {extra}");
                }
                Err(ComposeError::Component(first))
            }
        }
    }

    /// Whether state read by the last pass changed since it ran.
    pub fn is_dirty(&self) -> bool {
        self.composer.as_ref().is_some_and(|c| c.dirty.get())
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn composer(&self) -> Option<&Composer> {
        self.composer.as_ref()
    }
}

/// Marks the composition that created it as needing another pass.
#[derive(Clone, Default)]
pub struct Invalidator(Option<Rc<Cell<bool>>>);

impl Invalidator {
    pub fn invalidate(&self) {
        if let Some(flag) = &self.0 {
            log::trace!("composition invalidated");
            flag.set(true);
        }
    }
}

/// Invalidator for the running composition (inert outside one).
pub fn invalidator() -> Invalidator {
    COMPOSER.with(|c| Invalidator(c.borrow().as_ref().map(|comp| comp.dirty.clone())))
}

pub fn is_composing() -> bool {
    COMPOSER.with(|c| c.borrow().is_some())
}

/// Hands an error to the running composition's boundary. Returns `false`
/// (and logs) when no composition is running.
pub fn report_error(err: impl Into<BoxError>) -> bool {
    let err = err.into();
    COMPOSER.with(|c| match c.borrow_mut().as_mut() {
        Some(comp) => {
            comp.errors.push(err);
            true
        }
        None => {
            log::warn!("error reported outside of a composition: {err}");
            false
        }
    })
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    // reserve the slot first so remembers nested in `init` take the next ones
    let reserved = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let comp = c.as_mut()?;
        let cursor = comp.cursor;
        comp.cursor += 1;
        if cursor >= comp.slots.len() {
            comp.slots.push(None);
        }
        let existing = comp.slots[cursor]
            .as_ref()
            .map(|b| b.downcast_ref::<Rc<T>>().cloned());
        Some((cursor, existing))
    });

    let cursor = match reserved {
        None => return Rc::new(init()),
        Some((_, Some(Some(rc)))) => return rc,
        Some((cursor, Some(None))) => {
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            cursor
        }
        Some((cursor, None)) => cursor,
    };

    let rc = Rc::new(init());
    COMPOSER.with(|c| {
        if let Some(comp) = c.borrow_mut().as_mut() {
            comp.slots[cursor] = Some(Box::new(rc.clone()));
        }
    });
    rc
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let existing = COMPOSER.with(|c| {
        let c = c.borrow();
        let comp = c.as_ref()?;
        Some(comp.keyed_slots.get(&key).map(|b| b.downcast_ref::<Rc<T>>().cloned()))
    });

    match existing {
        None => return Rc::new(init()),
        Some(Some(Some(rc))) => return rc,
        Some(Some(None)) => log::warn!(
            "remember_with_key: key '{}' reused with a different type; replacing.",
            key
        ),
        Some(None) => {}
    }

    let rc = Rc::new(init());
    COMPOSER.with(|c| {
        if let Some(comp) = c.borrow_mut().as_mut() {
            comp.keyed_slots.insert(key, Box::new(rc.clone()));
        }
    });
    rc
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}
