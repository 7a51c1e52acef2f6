use mathfield_parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid LaTeX: {0}")]
    Parse(#[from] ParseError),
}
