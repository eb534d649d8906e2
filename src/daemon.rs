//! The register daemon: election, command handling, and the selection
//! negotiation state machine, driven by a single blocking dispatch loop.
//!
//! The daemon is either *idle* (no active register) or *serving* (one
//! register answers content requests). A successful PASTE moves it to
//! serving; losing the shared selection to another process moves it back
//! to idle; losing the marker selection shuts it down.

use std::time::Instant;

use tracing::{debug, info, trace};

use crate::atoms::{Atom, Atoms, REGISTER_COUNT};
use crate::config::ElectionConfig;
use crate::error::{Error, Result};
use crate::registers::RegisterStore;
use crate::transport::{ContentRequest, ConversionReply, Transport, TransportEvent};

/// The long-lived daemon instance.
pub struct Daemon<T: Transport> {
    transport: T,
    atoms: Atoms,
    store: RegisterStore,
    election: ElectionConfig,
    running: bool,
}

impl<T: Transport> Daemon<T> {
    /// Build a daemon over `transport` with freshly allocated registers.
    pub fn new(transport: T, atoms: Atoms, election: ElectionConfig) -> Self {
        let store = RegisterStore::new(&atoms);
        Self {
            transport,
            atoms,
            store,
            election,
            running: true,
        }
    }

    /// The register store (exposed for inspection).
    pub fn store(&self) -> &RegisterStore {
        &self.store
    }

    /// The underlying transport (exposed for inspection).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the dispatch loop would keep running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Attempt to become the sole daemon.
    ///
    /// Claims the marker selection, then polls the owner until it settles.
    /// Claims are atomic and last-wins at the server, so exactly one of any
    /// set of concurrent claimants observes itself as owner; the others get
    /// [`Error::ElectionLost`] once the poll deadline passes.
    pub fn claim_daemon_role(&mut self) -> Result<()> {
        self.transport.claim_selection(self.atoms.marker)?;
        self.transport.flush()?;

        let deadline = Instant::now() + self.election.timeout();
        loop {
            let owner = self.transport.selection_owner(self.atoms.marker)?;
            if owner == Some(self.transport.mailbox()) {
                info!("daemon role claimed");
                return Ok(());
            }
            if Instant::now() >= deadline {
                debug!(?owner, "marker selection settled on another owner");
                return Err(Error::ElectionLost);
            }
            std::thread::sleep(self.election.poll_interval());
        }
    }

    /// Claim the daemon role, then block dispatching events until the
    /// marker selection is lost to another claimant.
    pub fn run(&mut self) -> Result<()> {
        self.claim_daemon_role()?;
        while self.running {
            let event = self.transport.wait_event()?;
            self.dispatch(event)?;
            self.transport.flush()?;
        }
        info!("daemon shutting down");
        Ok(())
    }

    fn dispatch(&mut self, event: TransportEvent) -> Result<()> {
        match event {
            TransportEvent::Command { kind, index } => self.handle_command(kind, index),
            TransportEvent::ConversionDone { property } => self.handle_conversion_done(property),
            TransportEvent::ContentRequest(request) => self.handle_content_request(request),
            TransportEvent::SelectionLost { selection } => {
                self.handle_selection_lost(selection);
                Ok(())
            }
            TransportEvent::Ignored => Ok(()),
        }
    }

    fn handle_command(&mut self, kind: Atom, index: u32) -> Result<()> {
        let index = (index % REGISTER_COUNT as u32) as u8;
        if kind == self.atoms.copy {
            self.handle_copy(index)
        } else if kind == self.atoms.paste {
            self.handle_paste(index)
        } else {
            trace!(kind, "ignoring unknown command message");
            Ok(())
        }
    }

    /// COPY: ask the current owner of the shared selection to convert its
    /// content into the register's destination property. The bytes arrive
    /// later as a conversion completion correlated by that property.
    fn handle_copy(&mut self, index: u8) -> Result<()> {
        debug!(register = index, "requesting selection conversion");
        self.transport.request_conversion(
            self.atoms.primary,
            self.atoms.utf8_string,
            self.store.get(index).identity(),
        )
    }

    /// PASTE: start serving the register on the shared selection. Empty
    /// registers are a silent no-op.
    fn handle_paste(&mut self, index: u8) -> Result<()> {
        if self.store.get(index).content().is_none() {
            debug!(register = index, "paste of empty register ignored");
            return Ok(());
        }
        self.store.activate(index);
        debug!(register = index, "serving register on shared selection");
        self.transport.claim_selection(self.atoms.primary)
    }

    /// The other half of COPY: read the converted bytes out of the named
    /// property, store them in the matching register, and delete the
    /// property to reclaim server-side state. A completion that matches no
    /// register, or whose property carries no data, is dropped.
    fn handle_conversion_done(&mut self, property: Option<Atom>) -> Result<()> {
        let Some(property) = property else {
            debug!("conversion refused by selection owner");
            return Ok(());
        };

        if let Some(index) = self.store.find_by_identity(property) {
            if let Some(bytes) = self.transport.read_property(property)? {
                debug!(register = index, len = bytes.len(), "register filled");
                self.store.set_content(index, bytes);
            } else {
                debug!(register = index, "conversion produced no data");
            }
        } else {
            debug!(property, "conversion reply for unknown destination");
        }
        self.transport.delete_property(property)
    }

    /// Answer a third-party content request. The reply is sent
    /// unconditionally; refusals carry an empty property.
    fn handle_content_request(&mut self, request: ContentRequest) -> Result<()> {
        let reply = ConversionReply::answering(&request);
        let reply = if self.serve(&request)? {
            reply
        } else {
            reply.refused()
        };
        self.transport.send_reply(&reply)
    }

    /// Write the requested content to the negotiated property. Returns
    /// false when the request must be refused: nothing is being served, or
    /// the target is unsupported. The idle check comes first; even a
    /// target-list query is refused while idle.
    fn serve(&mut self, request: &ContentRequest) -> Result<bool> {
        let Some(register) = self.store.active() else {
            debug!(target = request.target, "no active register, refusing");
            return Ok(false);
        };

        let property = request.negotiated_property();
        if self.atoms.is_text_target(request.target) {
            let Some(bytes) = register.content() else {
                return Ok(false);
            };
            self.transport
                .write_bytes(request.requestor, property, request.target, bytes)?;
            Ok(true)
        } else if request.target == self.atoms.targets {
            let supported = self.atoms.supported_targets();
            self.transport
                .write_atoms(request.requestor, property, &supported)?;
            Ok(true)
        } else {
            debug!(target = request.target, "unsupported target, refusing");
            Ok(false)
        }
    }

    /// Losing the marker means another daemon took over: shut down. Losing
    /// any other selection just stops the active register from serving.
    fn handle_selection_lost(&mut self, selection: Atom) {
        if selection == self.atoms.marker {
            info!("marker selection lost, shutting down");
            self.running = false;
        } else {
            debug!(register = ?self.store.active_index(), "shared selection lost");
            self.store.clear_active();
        }
    }
}
