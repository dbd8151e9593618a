mod timer;
pub use timer::{CallbackId, EachCallback, OnceCallback, Seconds, Timer};
