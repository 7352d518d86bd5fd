pub mod fetch;
pub mod whoami;
