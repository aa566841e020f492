mod app;
mod dom;
mod net;
mod pixels;
mod predict;
mod prefs;
mod render;
mod state;

pub use app::run;
