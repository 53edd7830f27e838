pub mod column_classifier_impl;
pub mod config_error;
pub mod config_structs;
pub mod configuration_draft_impl;
pub mod global_params_impl;
pub mod technique_assignor_impl;
pub mod wire_id;
pub mod wizard_step;

#[cfg(test)]
mod tests;
