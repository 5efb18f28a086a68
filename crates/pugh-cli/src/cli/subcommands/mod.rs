mod branch;
mod criterion;
mod matrix;
mod option;

pub use branch::BranchCommands;
pub use criterion::CriterionCommands;
pub use matrix::MatrixCommands;
pub use option::OptionCommands;
