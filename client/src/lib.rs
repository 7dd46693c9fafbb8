mod app;
mod catalog;
mod dom;
mod recognizer;
mod render;

pub use app::GestureDock;
pub use recognizer::GestureRecognizer;
