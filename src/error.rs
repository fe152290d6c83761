use thiserror::Error;

/// Why a recolor pass did not run.
///
/// The display strings are the status line shown to the user.
#[derive(Debug, Error)]
pub enum RecolorError {
    #[error("SVG not loaded yet.")]
    DocumentNotLoaded,

    #[error("Load an image before applying colors.")]
    ImageNotLoaded,

    #[error("Image not ready yet.")]
    CanvasEmpty,

    #[error("Preparing layout...")]
    LayoutPending { frames: u32 },

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),
}

impl RecolorError {
    /// Not-ready conditions: nothing was mutated and the action can be retried.
    pub fn is_not_ready(&self) -> bool {
        matches!(
            self,
            RecolorError::DocumentNotLoaded
                | RecolorError::ImageNotLoaded
                | RecolorError::CanvasEmpty
                | RecolorError::LayoutPending { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("No <svg> root element found")]
    MissingRoot,

    #[error("SVG layout failed: {0}")]
    Layout(#[from] RenderError),
}
