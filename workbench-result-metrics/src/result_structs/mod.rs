pub mod processing_result_struct;
pub mod technique_detail_struct;
