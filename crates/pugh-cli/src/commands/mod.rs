pub mod branch;
pub mod comment;
pub mod criterion;
pub mod dispatch;
pub mod log;
pub mod matrix;
pub mod option;
pub mod rate;
pub mod shared;
pub mod show;
pub mod totals;
