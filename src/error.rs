use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot serialize tags: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TaggerResult<T> = Result<T, TaggerError>;
