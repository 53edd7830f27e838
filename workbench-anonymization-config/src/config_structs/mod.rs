pub mod column_mapping_struct;
pub mod configuration_struct;
pub mod dataset_struct;
pub mod draft_record_struct;
pub mod global_params_struct;
pub mod technique_struct;
