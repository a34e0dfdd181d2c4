pub mod service;
pub mod transfer;

#[cfg(test)]
mod memory;
