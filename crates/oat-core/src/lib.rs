pub mod config;
pub mod error;
pub mod parse;
pub mod transform;
pub mod tree;

pub use error::{ConvertError, ParseError};
pub use transform::{ConvertOptions, transform, transform_with_options};
pub use tree::ApiTreeSchema;
