pub mod dataset_config;
pub mod dataset_index;
pub mod label_writer;
pub mod labeler;
pub mod region_selector;
