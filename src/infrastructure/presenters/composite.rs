use crate::domain::ports::presenter::{PresentationError, Presenter, Toast};

/// Forwards each toast to every inner presenter, in order.
///
/// A failing presenter does not stop the others; the first error is returned.
#[derive(Default)]
pub struct CompositePresenter {
    presenters: Vec<Box<dyn Presenter>>,
}

impl CompositePresenter {
    #[must_use]
    pub fn new(presenters: Vec<Box<dyn Presenter>>) -> Self {
        Self { presenters }
    }
}

impl Presenter for CompositePresenter {
    fn present(&self, toast: &Toast) -> Result<(), PresentationError> {
        let mut first_error = None;
        for presenter in &self.presenters {
            if let Err(e) = presenter.present(toast) {
                tracing::warn!("Presenter failed: {e}");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
