pub mod ecb;
pub mod eurofxref;
