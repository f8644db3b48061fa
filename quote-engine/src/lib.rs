pub mod aggregator;
pub mod codec;
pub mod domain;
pub mod planes;
pub mod ports;
pub mod quote_cache;

#[cfg(test)]
mod test_support;
