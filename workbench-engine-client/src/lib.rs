pub mod anonymization_engine;
pub mod engine_error;
pub mod http_engine_client;

#[cfg(test)]
mod tests;
