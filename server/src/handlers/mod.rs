pub mod http;
pub mod joke;
pub mod login;

#[cfg(test)]
pub(crate) mod fakes;
