//! UI layer for the desktop client: app shell, screens, leaf widgets, the model viewer and themes.

pub mod app;
pub mod model_viewer;
pub mod panels;
pub mod theme;
pub mod widgets;

pub use app::InventHubApp;
