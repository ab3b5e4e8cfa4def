pub mod frame_loop;
pub mod svg_renderer;
pub mod transitions;

pub use frame_loop::FrameLoop;
pub use svg_renderer::{ChartEvent, SvgRenderer};
pub use transitions::Fade;
