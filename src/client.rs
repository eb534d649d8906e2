//! Client-side command path: locate the daemon and send it fire-and-forget
//! COPY/PASTE commands.

use tracing::debug;

use crate::atoms::{Atom, Atoms, REGISTER_COUNT};
use crate::error::{Error, Result};
use crate::transport::{Transport, Window};

/// A transient client invocation addressing the long-lived daemon.
pub struct Client<T: Transport> {
    transport: T,
    atoms: Atoms,
}

impl<T: Transport> Client<T> {
    /// Build a client over `transport`.
    pub fn new(transport: T, atoms: Atoms) -> Self {
        Self { transport, atoms }
    }

    /// Mailbox of the running daemon: whoever owns the marker selection.
    /// Absence is a caller-visible error; there is no retry.
    pub fn locate_daemon(&mut self) -> Result<Window> {
        self.transport
            .selection_owner(self.atoms.marker)?
            .ok_or(Error::NoDaemon)
    }

    /// Ask the daemon to capture the shared selection into `register`.
    pub fn copy(&mut self, register: u32) -> Result<()> {
        let command = self.atoms.copy;
        self.send(command, register)
    }

    /// Ask the daemon to serve `register` on the shared selection.
    pub fn paste(&mut self, register: u32) -> Result<()> {
        let command = self.atoms.paste;
        self.send(command, register)
    }

    fn send(&mut self, command: Atom, register: u32) -> Result<()> {
        let daemon = self.locate_daemon()?;
        let index = register % REGISTER_COUNT as u32;
        debug!(daemon, index, "sending command");
        self.transport.send_command(daemon, command, index)?;
        self.transport.flush()
    }
}
