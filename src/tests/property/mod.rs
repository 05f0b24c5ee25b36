//! Property-based tests
//!
//! - `input_buffer_props`: editing never leaves the cursor off a char boundary
//! - `upload_receipt_props`: legacy upload messages round out to filenames
//! - `collection_props`: appends never duplicate a filename

mod collection_props;
mod input_buffer_props;
mod upload_receipt_props;
