pub mod settings_loader;
pub mod settings_structs;
pub mod upload_check;
