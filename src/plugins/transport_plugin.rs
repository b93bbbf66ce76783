use bevy::prelude::*;

use crate::lobby::command::{CommandSink, OutboundCommand};

/// Hands queued commands to the outbound channel.
pub struct TransportPlugin;

impl Plugin for TransportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CommandSink>();
        app.add_message::<OutboundCommand>();
        app.add_systems(PostUpdate, forward_outbound);
    }
}

/// Fire-and-forget: nothing is awaited, the authority answers by updating
/// the lobby session.
pub(crate) fn forward_outbound(mut outbound: MessageReader<OutboundCommand>, sink: Res<CommandSink>) {
    for OutboundCommand(command) in outbound.read() {
        sink.send(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lobby::command::WsCommand;
    use std::sync::{Arc, Mutex};

    #[test]
    fn forwards_every_queued_command_once() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let log = sent.clone();

        let mut app = App::new();
        app.insert_resource(CommandSink::new(move |command| log.lock().unwrap().push(command.clone())))
            .add_plugins(TransportPlugin);

        app.world_mut().write_message(OutboundCommand(WsCommand::select_icon("fox")));
        app.world_mut().write_message(OutboundCommand(WsCommand::select_icon("owl")));
        app.update();
        app.update();

        assert_eq!(
            *sent.lock().unwrap(),
            vec![WsCommand::select_icon("fox"), WsCommand::select_icon("owl")]
        );
    }
}
