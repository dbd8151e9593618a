mod app;
pub use app::App;

mod event_handler;
pub use event_handler::EventHandler;

mod event_source;
pub use event_source::EventSource;

mod lifecycle;
pub use lifecycle::Lifecycle;

mod logger;
pub use logger::{LogLevel, Logger, StdoutLogger};
