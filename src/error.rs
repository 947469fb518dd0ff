//! Error types.
//!
//! Construction and configuration failures are reported synchronously to the
//! caller. Runtime anomalies (e.g. a node missing the attribute a force groups
//! by) are not errors: forces absorb them and log a warning.

/// Failure to build a [`Graph`](crate::graph::Graph) from caller data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: String },
    #[error("link {link} references unknown node: {id}")]
    UnknownEndpoint { link: usize, id: String },
    #[error("link {link} has a non-finite weight")]
    NonFiniteWeight { link: usize },
    #[error("node {id} has a non-finite initial position")]
    NonFinitePosition { id: String },
}

/// A force or simulation parameter outside its allowed range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("force `{force}`: {parameter} = {value} is invalid ({reason})")]
    OutOfRange {
        force: String,
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("invalid scale extent [{min}, {max}]")]
    InvalidScaleExtent { min: f64, max: f64 },
    #[error("simulation parameter {parameter} = {value} is invalid")]
    InvalidSimulation { parameter: &'static str, value: f64 },
}

impl ConfigError {
    pub(crate) fn out_of_range(
        force: &str,
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    ) -> Self {
        Self::OutOfRange {
            force: force.to_string(),
            parameter,
            value,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
