pub mod factory;
pub mod profiles;
