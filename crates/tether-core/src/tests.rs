use std::cell::RefCell;
use std::rc::Rc;

use crate::*;

#[derive(Debug, thiserror::Error)]
#[error("boom {0}")]
struct Boom(u32);

#[test]
fn test_signal_basic() {
    let sig = signal(42);
    assert_eq!(sig.get(), 42);

    sig.set(100);
    assert_eq!(sig.get(), 100);

    sig.update(|v| *v += 1);
    assert_eq!(sig.get(), 101);
}

#[test]
fn test_signal_subscription() {
    let sig = signal(0);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let seen_clone = seen.clone();
    sig.subscribe(move |v| seen_clone.borrow_mut().push(*v));

    sig.set(42);
    sig.update(|v| *v -= 2);
    assert_eq!(*seen.borrow(), vec![42, 40]);
}

#[test]
fn test_subscriber_may_read_signal() {
    let sig = signal(1);
    let reader = sig.clone();
    let seen = Rc::new(RefCell::new(0));
    let seen_clone = seen.clone();
    sig.subscribe(move |_| *seen_clone.borrow_mut() = reader.get() * 10);

    sig.set(7);
    assert_eq!(*seen.borrow(), 70);
}

#[test]
fn test_subscriber_may_write_signal() {
    let sig = signal(0);
    let writer = sig.clone();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    sig.subscribe(move |v| {
        seen_clone.borrow_mut().push(*v);
        if *v < 3 {
            writer.set(*v + 1);
        }
    });

    sig.set(1);
    assert_eq!(sig.get(), 3);
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_channel_default_and_unset() {
    let with_default = Channel::with_default("scale", 2.0f32);
    let unset = Channel::<f32>::unset("ratio");

    assert_eq!(with_default.fetch(), Some(2.0));
    assert_eq!(unset.fetch(), None);
    assert!(!with_default.is_provided());
}

#[test]
fn test_channel_nearest_publication_wins() {
    let ch = Channel::unset("label");

    provide(&ch, "outer", || {
        assert_eq!(ch.fetch(), Some("outer"));
        provide(&ch, "inner", || {
            assert_eq!(ch.fetch(), Some("inner"));
            assert_eq!(depth(), 2);
        });
        assert_eq!(ch.fetch(), Some("outer"));
    });
    assert_eq!(ch.fetch(), None);
    assert_eq!(depth(), 0);
}

#[test]
fn test_channels_are_independent() {
    let a = Channel::<u32>::unset("a");
    let b = Channel::<u32>::unset("b");
    assert_ne!(a.id(), b.id());

    provide(&a, 1, || {
        assert_eq!(a.fetch(), Some(1));
        assert_eq!(b.fetch(), None);
        assert!(a.is_provided());
        assert!(!b.is_provided());
    });
}

#[test]
fn test_unset_is_distinct_from_none_value() {
    let ch = Channel::<Option<u8>>::unset("maybe");
    assert_eq!(ch.fetch(), None);
    provide(&ch, None, || assert_eq!(ch.fetch(), Some(None)));
}

/// Publishes on its own channel whenever it is cloned.
struct Echo(Channel<u8>);

impl Clone for Echo {
    fn clone(&self) -> Self {
        provide(&self.0, 1, || assert_eq!(self.0.fetch(), Some(1)));
        Echo(self.0.clone())
    }
}

#[test]
fn test_fetch_releases_scope_chain_before_clone() {
    let inner = Channel::<u8>::unset("inner");
    let outer = Channel::<Echo>::unset("outer");

    provide(&outer, Echo(inner.clone()), || {
        let fetched = outer.fetch();
        assert!(fetched.is_some());
        assert_eq!(depth(), 1);
    });
    assert_eq!(inner.fetch(), None);
}

#[test]
fn test_provide_pops_on_unwind() {
    let ch = Channel::unset("panicky");
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        provide::<_, ()>(&ch, 5, || panic!("component failed"))
    }));
    assert!(result.is_err());
    assert_eq!(depth(), 0);
    assert_eq!(ch.fetch(), None);
}

#[test]
fn test_remember_persists_across_passes() {
    let mut c = Composition::new();
    let mut seen = Vec::new();
    for _ in 0..3 {
        let view = c
            .compose(|| {
                let n = remember_state(|| 0);
                *n.borrow_mut() += 1;
                Text(n.borrow().to_string())
            })
            .unwrap();
        seen.push(view.texts()[0].to_owned());
    }
    assert_eq!(seen, ["1", "2", "3"]);
    assert_eq!(c.passes(), 3);
    assert_eq!(c.composer().map(Composer::slot_count), Some(1));
}

#[test]
fn test_compositions_do_not_share_slots() {
    let build = || {
        let n = remember_state(|| 10);
        *n.borrow_mut() += 1;
        Text(n.borrow().to_string())
    };
    let mut first = Composition::new();
    let mut second = Composition::new();

    first.compose(build).unwrap();
    assert!(first.compose(build).unwrap().has_text("12"));
    assert!(second.compose(build).unwrap().has_text("11"));
}

#[test]
fn test_remember_outside_composition_is_fresh() {
    assert!(!is_composing());
    let a = remember(|| 1);
    let b = remember(|| 2);
    assert_eq!((*a, *b), (1, 2));
}

#[test]
fn test_key_based_remember() {
    let mut c = Composition::new();
    let view = c
        .compose(|| {
            let val1 = remember_with_key("test", || 42);
            let val2 = remember_with_key("test", || 100);
            // Should return the same instance
            assert!(Rc::ptr_eq(&val1, &val2));
            Text(val2.to_string())
        })
        .unwrap();
    assert!(view.has_text("42"));
    assert_eq!(c.composer().map(Composer::keyed_slot_count), Some(1));
}

#[test]
fn test_reentrant_compose_is_rejected() {
    let mut outer = Composition::new();
    let mut inner = Composition::new();
    outer
        .compose(|| {
            let r = inner.compose(Empty);
            assert!(matches!(r, Err(ComposeError::Reentrant)));
            Empty()
        })
        .unwrap();
    assert!(!is_composing());
}

#[test]
fn test_reported_error_fails_the_pass() {
    let mut c = Composition::new();
    let mut rendered_after = false;
    let err = c
        .compose(|| {
            assert!(report_error(Boom(1)));
            report_error(Boom(2));
            rendered_after = true;
            Empty()
        })
        .unwrap_err();

    assert!(rendered_after);
    assert_eq!(err.to_string(), "boom 1");
    assert_eq!(err.component_error::<Boom>().map(|b| b.0), Some(1));

    // the boundary resets on the next pass
    assert!(c.compose(Empty).is_ok());
}

#[test]
fn test_report_error_outside_composition() {
    assert!(!report_error(Boom(3)));
}

#[test]
fn test_signal_write_marks_composition_dirty() {
    let handle: Rc<RefCell<Option<Signal<u8>>>> = Rc::default();
    let mut c = Composition::new();
    let build = {
        let handle = handle.clone();
        move || {
            let s = remember_signal(|| 0u8);
            handle.borrow_mut().replace(s.clone());
            Text(s.get().to_string())
        }
    };

    c.compose(build.clone()).unwrap();
    assert!(!c.is_dirty());

    if let Some(s) = handle.borrow().as_ref() {
        s.set(3);
    }
    assert!(c.is_dirty());

    assert!(c.compose(build).unwrap().has_text("3"));
    assert!(!c.is_dirty());
}

#[test]
fn test_empty_view_outline() {
    let tree = Column(vec![Empty(), Text("a"), Row(vec![Empty()])]);
    assert_eq!(tree.to_string(), "Column\n  Text \"a\"\n  Row\n");
    assert!(Empty().with_children(vec![Empty()]).is_empty());
    assert!(!Row(vec![Empty()]).is_empty());
}
