//! Output accumulation and prompt matching over the transport stream.

mod buffer;

pub use buffer::CaptureBuffer;
