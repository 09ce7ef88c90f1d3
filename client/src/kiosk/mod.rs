pub mod enforcer;
pub mod names;
