//! The extract, transform and load stages and the pipeline that runs them.

pub mod extract;
pub mod load;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod rates;
pub mod transform;

pub use extract::{TableLayout, extract};
pub use load::{save_csv, save_table};
pub use pipeline::{Pipeline, PipelineError, PipelineFailure, RunReport, Stage};
pub use progress::{FileProgressLog, MemoryProgressLog, ProgressLog};
pub use query::{QueryValue, ResultSet, run_query};
pub use rates::{RateTable, load_rates};
pub use transform::transform;
