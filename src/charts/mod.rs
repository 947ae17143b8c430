//! Charts module - Chart rendering

mod renderer;

pub use renderer::{
    series_color, ChartBounds, ChartOptions, ImageFormat, RenderError, StaticChartRenderer,
    DEFAULT_TITLE, PALETTE,
};
