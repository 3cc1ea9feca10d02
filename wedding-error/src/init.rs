use thiserror::Error;

/// Failures while wiring the application context at startup
#[derive(Error, Debug)]
pub enum InitContextError {
    /// Seed data asked for a key no earlier initializer produced
    #[error("no seed data under `{0}`")]
    KeyNotFound(String),
    #[error("seed data under `{0}` has another type")]
    TypeMismatch(String),
    /// Startup step failed before the context was complete
    #[error("{0}")]
    Primitive(String),
}
