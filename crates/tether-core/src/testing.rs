use thiserror::Error;

use crate::error::ComposeError;
use crate::runtime::Composition;
use crate::view::View;

#[derive(Debug, Error)]
pub enum TestError {
    #[error("no button labelled {0:?} in the rendered tree")]
    NoSuchButton(String),
    #[error("nothing has been rendered yet")]
    NotRendered,
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// A headless renderer that drives a root component without a platform.
///
/// `TestRenderer` owns one [`Composition`], so remembered state survives
/// between passes exactly as it would on screen. Clicking a button runs its
/// handler and recomposes when the handler changed remembered state.
///
/// # Example
///
/// ```rust
/// use tether_core::testing::TestRenderer;
/// use tether_core::*;
///
/// #[allow(non_snake_case)]
/// fn CounterApp() -> View {
///     let count = remember_signal(|| 0);
///     let inc = count.clone();
///     Column(vec![
///         Text(count.get().to_string()),
///         Button("+", move || inc.update(|v| *v += 1)),
///     ])
/// }
///
/// let mut r = TestRenderer::new(CounterApp);
/// r.render().unwrap();
/// assert!(r.has_text("0"));
/// r.click("+").unwrap();
/// assert!(r.has_text("1"));
/// ```
pub struct TestRenderer {
    composition: Composition,
    root: Box<dyn Fn() -> View>,
    view: Option<View>,
}

impl TestRenderer {
    pub fn new(root: impl Fn() -> View + 'static) -> Self {
        Self {
            composition: Composition::new(),
            root: Box::new(root),
            view: None,
        }
    }

    /// Runs a composition pass and keeps the resulting tree.
    ///
    /// On error the previous tree is discarded, the same way an error
    /// boundary replaces a failed subtree.
    pub fn render(&mut self) -> Result<&View, ComposeError> {
        match self.composition.compose(|| (self.root)()) {
            Ok(view) => Ok(&*self.view.insert(view)),
            Err(e) => {
                self.view = None;
                Err(e)
            }
        }
    }

    /// Recomposes only when remembered state changed since the last pass.
    pub fn recompose(&mut self) -> Result<bool, ComposeError> {
        if self.view.is_some() && !self.composition.is_dirty() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn has_text(&self, text: &str) -> bool {
        self.view.as_ref().is_some_and(|v| v.has_text(text))
    }

    /// Invokes the handler of the button labelled `label`, then recomposes.
    pub fn click(&mut self, label: &str) -> Result<(), TestError> {
        let view = self.view.as_ref().ok_or(TestError::NotRendered)?;
        let on_click = view
            .find_button(label)
            .ok_or_else(|| TestError::NoSuchButton(label.to_owned()))?;
        on_click();
        self.recompose()?;
        Ok(())
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }
}
