//! Feed export transforms.

pub mod delimited;
