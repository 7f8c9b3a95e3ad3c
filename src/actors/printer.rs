use std::fmt::{Debug, Display};

use crate::compute::context::Context;
use crate::core::actor::{Actor, HasFromPropState};
use crate::core::actor_builder::ActorBuilder;
use crate::core::inbound::{
    HasOnMessage, InboundChannel, IsInboundHub, IsInboundMessage, IsInboundMessageNew,
};
use crate::core::outbound::NullOutbound;
use crate::core::runner::DefaultRunner;
use crate::core::value::{NullState, Value};

/// Anything the printer can log to the console.
pub trait Printable: Debug + Display + Clone + Send + Sync + 'static {}

impl<T: Debug + Display + Clone + Send + Sync + 'static> Printable for T {}

/// Line prefix of a printer.
#[derive(Clone, Debug)]
pub struct PrinterProp {
    /// Printed before every message, followed by a colon.
    pub topic: String,
}

impl Value for PrinterProp {}

/// The only message of the printer.
#[derive(Clone, Debug)]
pub struct PrintMessage<T: Printable>(pub T);

impl<T: Printable> IsInboundMessage for PrintMessage<T> {
    type Prop = PrinterProp;
    type State = NullState;
    type OutboundHub = NullOutbound;

    fn inbound_channel(&self) -> String {
        "Printable".to_owned()
    }
}

impl<T: Printable> HasOnMessage for PrintMessage<T> {
    fn on_message(self, prop: &PrinterProp, _state: &mut NullState, _outbound: &NullOutbound) {
        println!("{}: {}", prop.topic, self.0);
    }
}

impl<T: Printable> IsInboundMessageNew<T> for PrintMessage<T> {
    fn new(_inbound_channel: String, value: T) -> Self {
        PrintMessage(value)
    }
}

/// Sink which prints each message it receives as `topic: message`.
pub type Printer<T> = Actor<PrinterProp, PrinterInbound<T>, NullState, NullOutbound>;

impl<T: Printable> Printer<T> {
    /// Adds a printer for `topic` to the pipeline.
    pub fn new_with_topic(context: &mut Context, topic: &str) -> Self {
        Self::from_prop_and_state(
            context,
            PrinterProp {
                topic: topic.to_owned(),
            },
            NullState::default(),
        )
    }
}

impl<T: Printable>
    HasFromPropState<
        PrinterProp,
        PrinterInbound<T>,
        NullState,
        NullOutbound,
        PrintMessage<T>,
        DefaultRunner<PrinterProp, PrinterInbound<T>, NullState, NullOutbound>,
    > for Printer<T>
{
    fn name_hint(prop: &PrinterProp) -> String {
        format!("Printer({})", prop.topic)
    }
}

/// Inbound hub of the printer.
pub struct PrinterInbound<T: Printable> {
    /// Messages to print.
    pub printable: InboundChannel<T, PrintMessage<T>>,
}

impl<T: Printable> IsInboundHub<PrinterProp, NullState, NullOutbound, PrintMessage<T>>
    for PrinterInbound<T>
{
    fn from_builder(
        builder: &mut ActorBuilder<PrinterProp, NullState, PrintMessage<T>>,
        actor_name: &str,
    ) -> Self {
        Self {
            printable: InboundChannel::new(
                builder.context,
                actor_name,
                &builder.sender,
                "Printable".to_owned(),
            ),
        }
    }
}
