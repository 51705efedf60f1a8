mod config;
mod contexts;
mod cooccurrence;
mod error;
mod matrix;
mod pipeline;
mod tokenizer;
mod vocab;

pub use config::{files_handling, Config, JsonTypes};
pub use contexts::Contexts;
pub use cooccurrence::Counts;
pub use error::{CoocError, ErrorKind};
pub use matrix::{CooMatrix, Entry};
pub use pipeline::Pipeline;
pub use tokenizer::{Fallible, Tokenizer, WhitespaceTokenizer};
pub use vocab::Vocab;
