pub mod result_export;
pub mod result_metrics_impl;
pub mod result_structs;

#[cfg(test)]
mod tests;
