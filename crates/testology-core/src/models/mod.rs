pub mod answer;
pub mod chunk;
pub mod result;
pub mod snapshot;
