pub mod classifier;
pub mod extraction_model;
pub mod identifier_map;
pub mod names;
pub mod simplifier;
pub mod tree_builder;
