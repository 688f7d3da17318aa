pub mod model;
pub mod tree;
