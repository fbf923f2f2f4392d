//! Errors surfaced by scene building, configuration, and output

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot build a bounding volume hierarchy over an empty scene")]
    EmptyScene,

    #[error("Object has no bounding box and cannot be placed in a bounding volume hierarchy")]
    Unbounded,

    #[error("Config lists objects but no camera")]
    MissingCamera,

    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    #[error("Render stopped early: {rendered} of {expected} rows finished")]
    IncompleteRender { rendered: usize, expected: usize },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
