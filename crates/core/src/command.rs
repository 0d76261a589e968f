use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::command::{Command, CommandHandler};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type ErasedHandler = Arc<dyn Fn(&dyn Command) -> Result<()> + Send + Sync>;

/// One handler per concrete command type.
#[derive(Default)]
pub struct CommandHandlerRegistry {
    handlers: RwLock<HashMap<TypeId, ErasedHandler>>,
}

impl CommandHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `C`, replacing any previous handler.
    pub fn register<C, H>(&self, handler: H)
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |command: &dyn Command| {
            match command.as_any().downcast_ref::<C>() {
                Some(command) => handler.handle(command),
                None => Err(ConnectorError::internal(format!(
                    "Command {} dispatched to handler for {}",
                    command.command_id(),
                    type_name::<C>()
                ))),
            }
        });
        self.handlers
            .write()
            .expect("command handler lock poisoned")
            .insert(TypeId::of::<C>(), erased);
    }

    pub fn has_handler<C: Command>(&self) -> bool {
        self.handlers
            .read()
            .expect("command handler lock poisoned")
            .contains_key(&TypeId::of::<C>())
    }

    pub fn dispatch(&self, command: &dyn Command) -> Result<()> {
        let handler = self
            .handlers
            .read()
            .expect("command handler lock poisoned")
            .get(&command.as_any().type_id())
            .cloned();

        match handler {
            Some(handler) => handler(command),
            None => Err(ConnectorError::new(
                ErrorCode::NoHandlerRegistered,
                format!("No command handler registered for command {:?}", command),
            )),
        }
    }
}
