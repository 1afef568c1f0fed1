#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    /// The payload could not be decoded as an image.
    #[error("Image payload could not be decoded: {0}")]
    UnreadableImage(String),

    /// The detection backend itself failed.
    #[error("Detection backend failure: {0}")]
    Backend(String),
}
