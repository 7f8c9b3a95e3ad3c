use std::sync::Arc;

use tracing::warn;

use crate::core::outbound::HasActivate;
use crate::core::outbound::IsGenericConnection;

pub(crate) type ConnectionRegister<T> = Vec<Arc<dyn IsGenericConnection<T> + Send + Sync>>;

/// Connection register of an outbound channel.
///
/// While the pipeline is configured, the register lives in the actor handle handed to the user
/// ([ConnectionEnum::Config]). The actor node owns the [ConnectionEnum::Active] counterpart. Once
/// the handle is dropped at the end of the configuration, the register is launched to the node
/// which picks it up on activation.
pub enum ConnectionEnum<T> {
    /// Configuration of the connection
    Config(ConnectionConfig<T>),
    /// Active connection
    Active(ActiveConnection<T>),
}

/// Connections collected during configuration.
pub struct ConnectionConfig<T> {
    pub(crate) connection_register: ConnectionRegister<T>,
    maybe_register_launch_pad: Option<tokio::sync::oneshot::Sender<ConnectionRegister<T>>>,
    maybe_register_landing_pad: Option<tokio::sync::oneshot::Receiver<ConnectionRegister<T>>>,
}

impl<T> Drop for ConnectionConfig<T> {
    fn drop(&mut self) {
        if let Some(connection_launch_pad) = self.maybe_register_launch_pad.take() {
            let connection_register = std::mem::take(&mut self.connection_register);
            // the node may be gone already, e.g. if the pipeline was never run
            let _ = connection_launch_pad.send(connection_register);
        }
    }
}

impl<T> ConnectionConfig<T> {
    fn new() -> Self {
        let (connection_launch_pad, connection_landing_pad) = tokio::sync::oneshot::channel();
        Self {
            connection_register: vec![],
            maybe_register_launch_pad: Some(connection_launch_pad),
            maybe_register_landing_pad: Some(connection_landing_pad),
        }
    }
}

/// Connections used at runtime.
pub struct ActiveConnection<T> {
    pub(crate) maybe_registers: Option<ConnectionRegister<T>>,
    maybe_register_landing_pad: Option<tokio::sync::oneshot::Receiver<ConnectionRegister<T>>>,
}

impl<T: Clone + Send + Sync + 'static> ConnectionEnum<T> {
    pub(crate) fn new() -> Self {
        Self::Config(ConnectionConfig::new())
    }

    pub(crate) fn push(&mut self, connection: Arc<dyn IsGenericConnection<T> + Send + Sync>) {
        match self {
            Self::Config(config) => {
                config.connection_register.push(connection);
            }
            Self::Active(_) => {
                warn!("cannot connect to an active outbound channel, connection ignored");
            }
        }
    }

    pub(crate) fn send(&self, msg: T) {
        match self {
            Self::Config(_) => {
                warn!("cannot send through an outbound channel which is not active");
            }
            Self::Active(active) => {
                if let Some(registers) = &active.maybe_registers {
                    for connection in registers.iter() {
                        connection.send_impl(msg.clone());
                    }
                }
            }
        }
    }
}

impl<T> HasActivate for ConnectionEnum<T> {
    fn extract(&mut self) -> Self {
        match self {
            Self::Config(config) => Self::Active(ActiveConnection {
                maybe_registers: None,
                maybe_register_landing_pad: config.maybe_register_landing_pad.take(),
            }),
            Self::Active(_) => {
                warn!("outbound channel extracted twice");
                Self::Active(ActiveConnection {
                    maybe_registers: None,
                    maybe_register_landing_pad: None,
                })
            }
        }
    }

    fn activate(&mut self) {
        match self {
            Self::Config(_) => {
                warn!("cannot activate outbound channel during configuration");
            }
            Self::Active(active) => {
                if let Some(mut landing_pad) = active.maybe_register_landing_pad.take() {
                    match landing_pad.try_recv() {
                        Ok(connection_register) => {
                            active.maybe_registers = Some(connection_register);
                        }
                        Err(err) => {
                            warn!("connections of outbound channel not received: {}", err);
                        }
                    }
                }
            }
        }
    }
}
