pub mod action_model;
pub mod dispatcher;
pub mod preview;
pub mod proposal;
