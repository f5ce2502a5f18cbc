use std::fmt;
use std::rc::Rc;

pub type Callback = Rc<dyn Fn()>;

#[derive(Clone)]
pub enum ViewKind {
    /// Renders nothing; what a component returns when it has nothing to show.
    Empty,
    Column,
    Row,
    Text {
        text: String,
    },
    Button {
        text: String,
        on_click: Callback,
    },
}

impl fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Empty => write!(f, "Empty"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            ViewKind::Button { text, .. } => f
                .debug_struct("Button")
                .field("text", text)
                .field("on_click", &"<callback>")
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub kind: ViewKind,
    pub children: Vec<View>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            kind,
            children: vec![],
        }
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ViewKind::Empty) && self.children.iter().all(View::is_empty)
    }

    /// Depth-first, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a View)) {
        f(self);
        for c in &self.children {
            c.walk(f);
        }
    }

    /// Visible text in tree order (text nodes and button labels).
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |v| match &v.kind {
            ViewKind::Text { text } | ViewKind::Button { text, .. } => out.push(text.as_str()),
            _ => {}
        });
        out
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().contains(&needle)
    }

    /// Click handler of the first button labelled `label`.
    pub fn find_button(&self, label: &str) -> Option<Callback> {
        let mut found = None;
        self.walk(&mut |v| {
            if found.is_none()
                && let ViewKind::Button { text, on_click } = &v.kind
                && text == label
            {
                found = Some(on_click.clone());
            }
        });
        found
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        if matches!(self.kind, ViewKind::Empty) && self.children.is_empty() {
            return Ok(());
        }
        write!(f, "{:indent$}", "", indent = indent * 2)?;
        match &self.kind {
            ViewKind::Empty => writeln!(f, "Empty")?,
            ViewKind::Column => writeln!(f, "Column")?,
            ViewKind::Row => writeln!(f, "Row")?,
            ViewKind::Text { text } => writeln!(f, "Text {text:?}")?,
            ViewKind::Button { text, .. } => writeln!(f, "Button {text:?}")?,
        }
        for c in &self.children {
            c.write_outline(f, indent + 1)?;
        }
        Ok(())
    }
}

/// Indented outline of the tree; empty leaves are skipped.
impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}
