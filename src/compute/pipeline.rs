use std::collections::HashMap;

use tracing::{info, warn};

use crate::compute::topology::Topology;
use crate::core::actor::IsActorNode;
use crate::core::inbound::{IsInboundMessage, IsInboundMessageNew};
use crate::core::outbound::NullOutbound;
use crate::core::value::{NullProp, NullState};

/// A message to cancel the pipeline.
#[derive(Clone, Debug)]
pub struct CancelRequest;

impl CancelRequest {
    pub(crate) const CANCEL_REQUEST_INBOUND_CHANNEL: &'static str = "CANCEL";
}

impl IsInboundMessage for CancelRequest {
    type Prop = NullProp;
    type State = NullState;
    type OutboundHub = NullOutbound;

    fn inbound_channel(&self) -> String {
        Self::CANCEL_REQUEST_INBOUND_CHANNEL.to_owned()
    }
}

impl IsInboundMessageNew<()> for CancelRequest {
    fn new(_inbound_name: String, _: ()) -> Self {
        CancelRequest
    }
}

/// Compute pipeline, strictly speaking a DAG (directed acyclic graph) of actors. It is created by
/// the [Context::configure()](crate::compute::Context::configure) method.
pub struct Pipeline {
    actors: Vec<Box<dyn IsActorNode + Send>>,
    topology: Topology,
    cancel_request_sender_template: tokio::sync::mpsc::UnboundedSender<CancelRequest>,
    cancel_request_receiver: Option<tokio::sync::mpsc::UnboundedReceiver<CancelRequest>>,
}

impl Pipeline {
    pub(crate) fn new(
        actors: Vec<Box<dyn IsActorNode + Send>>,
        topology: Topology,
        cancel_request_sender_template: tokio::sync::mpsc::UnboundedSender<CancelRequest>,
        cancel_request_receiver: tokio::sync::mpsc::UnboundedReceiver<CancelRequest>,
    ) -> Self {
        topology.analyze_graph_topology();
        Pipeline {
            actors,
            topology,
            cancel_request_sender_template,
            cancel_request_receiver: Some(cancel_request_receiver),
        }
    }

    /// Returns a sender to send cancel requests to the pipeline.
    pub fn get_cancel_request_sender(&self) -> tokio::sync::mpsc::UnboundedSender<CancelRequest> {
        self.cancel_request_sender_template.clone()
    }

    /// Executes the compute graph.
    ///
    /// It consumes the self, starts execution of the pipeline and returns a future (since it is
    /// an async function) that resolves to the pipeline itself. The future is completed once a
    /// cancel request was received and all actors have stopped.
    ///
    /// [IsActorNode::run()] is called for each actor in the pipeline in a dedicated tokio task.
    /// Hence, the actors run concurrently. Each actor starts from its initial state.
    ///
    /// On cancellation the actors are stopped one by one, upstream before downstream, and each
    /// one handles its queued messages before it stops. Hence no message sent before the cancel
    /// request is lost.
    pub async fn run(mut self) -> Self {
        info!("Pipeline started ...");

        let mut cancel_request_receiver = match self.cancel_request_receiver.take() {
            Some(receiver) => receiver,
            None => {
                warn!("Pipeline is already running");
                return self;
            }
        };

        // Ctrl-C cancels the pipeline. Only one handler can be installed per process.
        let cancel_requester = self.get_cancel_request_sender();
        if let Err(err) = ctrlc::set_handler(move || {
            let _ = cancel_requester.send(CancelRequest);
        }) {
            warn!("Ctrl-C handler not installed: {}", err);
        }

        let names = self.actor_names();
        let mut running = HashMap::new();
        for mut actor in std::mem::take(&mut self.actors) {
            actor.reset();
            let (kill_sender, kill_receiver) = tokio::sync::broadcast::channel(1);
            let name = actor.name().clone();
            let handle = tokio::spawn(async move {
                actor.run(kill_receiver).await;
                actor
            });
            running.insert(name, (kill_sender, handle));
        }

        match cancel_request_receiver.recv().await {
            Some(_) => {
                info!("Pipeline cancellation requested");
            }
            None => {
                warn!("Cancel request channel closed");
            }
        }

        // Stop upstream first. An actor is only killed once everything feeding it has finished,
        // hence it sees every message sent before the cancellation.
        let mut stopped = HashMap::new();
        for name in self.topology.shutdown_order().into_iter().chain(names.clone()) {
            let Some((kill_sender, handle)) = running.remove(&name) else {
                continue;
            };
            let _ = kill_sender.send(());
            match handle.await {
                Ok(actor) => {
                    stopped.insert(name, actor);
                }
                Err(err) => warn!("Actor task {} failed: {}", name, err),
            }
        }
        self.actors = names
            .iter()
            .filter_map(|name| stopped.remove(name))
            .collect();

        while cancel_request_receiver.try_recv().is_ok() {}
        self.cancel_request_receiver = Some(cancel_request_receiver);

        info!("Pipeline execution finished");
        self
    }

    /// Names of the actors, in the order they were added.
    pub fn actor_names(&self) -> Vec<String> {
        self.actors.iter().map(|a| a.name().clone()).collect()
    }

    /// Textual description of the actors and their connections.
    pub fn flow_graph(&self) -> String {
        self.topology.flow_graph()
    }

    /// Prints the flow graph of the compute graph.
    pub fn print_flow_graph(&self) {
        println!("{}", self.flow_graph());
    }
}
