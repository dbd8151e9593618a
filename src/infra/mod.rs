mod commands;
pub use commands::{CommandSource, CommandStream, TimerCommand, TimerHandle};

mod main_program;
pub use main_program::MainProgram;

mod ticker;
pub use ticker::{IntervalTickSource, TickSource, TickStream};

mod timer_app;
pub use timer_app::TimerApp;
