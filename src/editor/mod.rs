//! Raw markup editor
//!
//! The editor shows the buffer with its tags visible and colored, reports the
//! selection back into the draft and applies selections requested by
//! formatting commands.

mod highlight;
mod widget;

pub use highlight::markup_layout_job;
pub use widget::EditorWidget;
