//! Scripted in-memory transport for unit tests.

use std::collections::{HashMap, VecDeque};

use crate::atoms::Atom;
use crate::error::{Error, Result};
use crate::transport::{ConversionReply, Transport, TransportEvent, Window};

/// Everything a [`FakeTransport`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FakeAction {
    Claimed(Atom),
    CommandSent {
        daemon: Window,
        command: Atom,
        index: u32,
    },
    ConversionRequested {
        selection: Atom,
        target: Atom,
        destination: Atom,
    },
    PropertyDeleted(Atom),
    BytesWritten {
        window: Window,
        property: Atom,
        kind: Atom,
        data: Vec<u8>,
    },
    AtomsWritten {
        window: Window,
        property: Atom,
        atoms: Vec<Atom>,
    },
    ReplySent(ConversionReply),
}

/// In-memory [`Transport`] with a scripted event queue and an action log.
///
/// Ownership claims settle on `claim_winner` when set, modeling a rival
/// process whose later claim wins the race.
pub(crate) struct FakeTransport {
    pub(crate) mailbox: Window,
    pub(crate) claim_winner: Option<Window>,
    pub(crate) owners: HashMap<Atom, Window>,
    pub(crate) properties: HashMap<Atom, Vec<u8>>,
    pub(crate) events: VecDeque<TransportEvent>,
    pub(crate) actions: Vec<FakeAction>,
    pub(crate) flushes: usize,
}

impl FakeTransport {
    pub(crate) fn new(mailbox: Window) -> Self {
        Self {
            mailbox,
            claim_winner: None,
            owners: HashMap::new(),
            properties: HashMap::new(),
            events: VecDeque::new(),
            actions: Vec::new(),
            flushes: 0,
        }
    }

    pub(crate) fn queue(&mut self, event: TransportEvent) {
        self.events.push_back(event);
    }
}

impl Transport for FakeTransport {
    fn mailbox(&self) -> Window {
        self.mailbox
    }

    fn claim_selection(&mut self, selection: Atom) -> Result<()> {
        let winner = self.claim_winner.unwrap_or(self.mailbox);
        self.owners.insert(selection, winner);
        self.actions.push(FakeAction::Claimed(selection));
        Ok(())
    }

    fn selection_owner(&mut self, selection: Atom) -> Result<Option<Window>> {
        Ok(self.owners.get(&selection).copied())
    }

    fn send_command(&mut self, daemon: Window, command: Atom, index: u32) -> Result<()> {
        self.actions.push(FakeAction::CommandSent {
            daemon,
            command,
            index,
        });
        Ok(())
    }

    fn request_conversion(
        &mut self,
        selection: Atom,
        target: Atom,
        destination: Atom,
    ) -> Result<()> {
        self.actions.push(FakeAction::ConversionRequested {
            selection,
            target,
            destination,
        });
        Ok(())
    }

    fn read_property(&mut self, property: Atom) -> Result<Option<Vec<u8>>> {
        Ok(self
            .properties
            .get(&property)
            .filter(|value| !value.is_empty())
            .cloned())
    }

    fn delete_property(&mut self, property: Atom) -> Result<()> {
        self.properties.remove(&property);
        self.actions.push(FakeAction::PropertyDeleted(property));
        Ok(())
    }

    fn write_bytes(
        &mut self,
        window: Window,
        property: Atom,
        kind: Atom,
        data: &[u8],
    ) -> Result<()> {
        self.actions.push(FakeAction::BytesWritten {
            window,
            property,
            kind,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn write_atoms(&mut self, window: Window, property: Atom, atoms: &[Atom]) -> Result<()> {
        self.actions.push(FakeAction::AtomsWritten {
            window,
            property,
            atoms: atoms.to_vec(),
        });
        Ok(())
    }

    fn send_reply(&mut self, reply: &ConversionReply) -> Result<()> {
        self.actions.push(FakeAction::ReplySent(reply.clone()));
        Ok(())
    }

    fn wait_event(&mut self) -> Result<TransportEvent> {
        self.events
            .pop_front()
            .ok_or_else(|| Error::Transport("event queue exhausted".to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
