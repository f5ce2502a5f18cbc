use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + 'static>;

#[derive(Debug, Error)]
pub enum ComposeError {
    /// First error a component reported during the pass.
    #[error("{0}")]
    Component(BoxError),

    #[error("composition started while another composition is running on this thread")]
    Reentrant,
}

impl ComposeError {
    /// Downcasts a component error to its concrete type.
    pub fn component_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            ComposeError::Component(e) => e.downcast_ref::<E>(),
            ComposeError::Reentrant => None,
        }
    }
}
