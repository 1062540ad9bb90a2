pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{RawPageFragment, RunReport, SummaryDocument};
pub use crate::domain::ports::{Notifier, PageSource, Pipeline, Storage};
pub use crate::utils::error::Result;
