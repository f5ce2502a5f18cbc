#![allow(non_snake_case)]
//! Headless widgets.

use std::rc::Rc;

use crate::{View, ViewKind};

pub fn Empty() -> View {
    View::new(ViewKind::Empty)
}

pub fn Column(children: Vec<View>) -> View {
    View::new(ViewKind::Column).with_children(children)
}

pub fn Row(children: Vec<View>) -> View {
    View::new(ViewKind::Row).with_children(children)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}

pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    View::new(ViewKind::Button {
        text: text.into(),
        on_click: Rc::new(on_click),
    })
}
