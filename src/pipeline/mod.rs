mod compare;

pub use compare::{CompareOptions, ComparePipeline};
