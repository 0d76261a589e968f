use dsc_error::Result;
use std::any::Any;
use std::fmt::Debug;

/// A unit of work submitted to a command queue.
pub trait Command: Debug + Send + Sync + 'static {
    fn command_id(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

pub trait CommandHandler<C: Command>: Send + Sync {
    fn handle(&self, command: &C) -> Result<()>;
}
