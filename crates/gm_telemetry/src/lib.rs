mod dataset;
mod error;
mod row;

pub use dataset::Dataset;
pub use error::Error;
pub use row::Row;
