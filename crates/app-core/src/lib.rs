pub mod config;
pub mod constants;
pub mod mapper;
pub mod scene;
pub mod state;
pub mod stats;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use config::*;
pub use mapper::*;
pub use state::*;
