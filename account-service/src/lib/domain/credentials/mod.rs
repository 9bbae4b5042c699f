pub mod errors;
pub mod ports;

#[cfg(test)]
pub mod mock;
