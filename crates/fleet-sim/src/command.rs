//! Queued control commands.
//!
//! A front-end never touches fleet state directly.  It sends [`Command`]s,
//! either through [`Fleet::submit`] or through a [`CommandSender`] handed to
//! another thread, and the fleet applies them at the start of the next tick.
//!
//! [`Fleet::submit`]: crate::Fleet::submit

use std::fmt;
use std::sync::mpsc::Sender;

use fleet_core::{RobotId, VertexId};

use crate::{FleetError, FleetResult};

/// A request from the control surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Spawn { vertex: VertexId },
    AssignDestination { robot: RobotId, vertex: VertexId },
    Charge { robot: RobotId },
    StopCharge { robot: RobotId },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Spawn { vertex } => write!(f, "spawn at {vertex}"),
            Command::AssignDestination { robot, vertex } => write!(f, "send {robot} to {vertex}"),
            Command::Charge { robot } => write!(f, "charge {robot}"),
            Command::StopCharge { robot } => write!(f, "stop charging {robot}"),
        }
    }
}

/// What an accepted command produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandOutput {
    Spawned(RobotId),
    Accepted,
}

/// A command together with the result of applying it.
#[derive(Debug)]
pub struct CommandOutcome {
    pub command: Command,
    pub result:  FleetResult<CommandOutput>,
}

impl CommandOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The robot created by a successful `Spawn`.
    pub fn spawned(&self) -> Option<RobotId> {
        match self.result {
            Ok(CommandOutput::Spawned(id)) => Some(id),
            _ => None,
        }
    }
}

/// Cloneable, `Send` handle for queueing commands from other threads.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    pub(crate) fn new(tx: Sender<Command>) -> Self {
        Self { tx }
    }

    /// Queue `command` for the next tick.
    ///
    /// # Errors
    ///
    /// [`FleetError::Disconnected`] once the fleet has been dropped.
    pub fn send(&self, command: Command) -> FleetResult<()> {
        self.tx.send(command).map_err(|_| FleetError::Disconnected)
    }
}
