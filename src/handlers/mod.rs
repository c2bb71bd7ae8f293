//! HTTP handlers

pub mod frame;
pub mod health;
pub mod stream;
pub mod view;

#[cfg(test)]
mod tests;
