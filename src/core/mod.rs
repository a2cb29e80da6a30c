pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{ServiceRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, DocumentFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
