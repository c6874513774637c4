pub mod header;
pub mod upload_area;
pub mod image_preview;
pub mod processing_indicator;
pub mod result_view;
