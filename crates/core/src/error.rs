/// Domain-level errors for the core crate.
///
/// Both imaging variants are fatal to the single annotate call that
/// produced them, never to the surrounding pipeline: the caller is
/// expected to log and move on to the next item.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input bytes could not be decoded as a raster image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Re-encoding the annotated raster failed.
    #[error("Failed to encode image: {0}")]
    Encode(String),
}
