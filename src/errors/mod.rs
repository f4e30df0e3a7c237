pub mod frame_error;
pub mod registry_error;
