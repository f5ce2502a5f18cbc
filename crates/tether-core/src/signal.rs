use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::{invalidator, remember};

pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: Vec<Rc<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
        })))
    }
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }
    pub fn set(&self, v: T)
    where
        T: Clone,
    {
        self.0.borrow_mut().value = v;
        self.notify();
    }
    pub fn update<F: FnOnce(&mut T)>(&self, f: F)
    where
        T: Clone,
    {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) {
        self.0.borrow_mut().subs.push(Rc::new(f));
    }

    // subscribers get a snapshot so they may read or write the signal again
    fn notify(&self)
    where
        T: Clone,
    {
        let (value, subs) = {
            let inner = self.0.borrow();
            (inner.value.clone(), inner.subs.clone())
        };
        for s in subs {
            s(&value);
        }
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}

/// Remembered signal whose writes mark the owning composition dirty.
pub fn remember_signal<T: 'static>(init: impl FnOnce() -> T) -> Signal<T> {
    let sig = remember(|| {
        let s = signal(init());
        let inv = invalidator();
        s.subscribe(move |_| inv.invalidate());
        s
    });
    (*sig).clone()
}
