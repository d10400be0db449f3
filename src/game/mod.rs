pub mod bot;
pub mod collision;
pub mod constants;
pub mod food;
pub mod math;
pub mod notices;
pub mod population;
pub mod position;
pub mod render;
pub mod round;
pub mod snake;
pub mod types;
pub mod world;
