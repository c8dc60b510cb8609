mod render;
mod writer;

pub use render::render_summary;
pub use writer::{write_jsonl, write_report, ReportLine};
