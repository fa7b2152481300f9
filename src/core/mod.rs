pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{Candidate, LoadReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RepositoryHost, Storage};
pub use crate::utils::error::Result;
