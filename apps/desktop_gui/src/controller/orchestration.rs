//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui->backend queue full; dropping command");
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend worker disconnected");
            *status =
                "Backend worker disconnected (possible startup failure); restart the app".to_string();
        }
    }
}

pub fn dispatch_all(
    cmd_tx: &Sender<BackendCommand>,
    cmds: impl IntoIterator<Item = BackendCommand>,
    status: &mut String,
) {
    for cmd in cmds {
        dispatch_backend_command(cmd_tx, cmd, status);
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn full_queue_sets_status_instead_of_blocking() {
        let (tx, _rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::LoadGroups, &mut status);
        assert!(status.is_empty());
        dispatch_backend_command(&tx, BackendCommand::LoadUsers, &mut status);
        assert!(status.contains("full"));
    }

    #[test]
    fn disconnected_worker_is_reported() {
        let (tx, rx) = bounded::<BackendCommand>(4);
        drop(rx);
        let mut status = String::new();
        dispatch_all(&tx, [BackendCommand::LoadMentors], &mut status);
        assert!(status.contains("disconnected"));
    }
}
