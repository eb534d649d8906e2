//! X11 transport on `x11rb`.
//!
//! Owns the connection and a 1x1 unmapped helper window that serves as this
//! process's mailbox: it receives command messages, collects conversion
//! results in properties, and is the owner recorded against any selection
//! we claim.

use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    AtomEnum, ClientMessageEvent, ConnectionExt, CreateWindowAux, EventMask, PropMode,
    SelectionNotifyEvent, WindowClass, SELECTION_NOTIFY_EVENT,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::atoms::{self, Atom, Atoms, REGISTER_COUNT};
use crate::error::Result;
use crate::transport::{ContentRequest, ConversionReply, Transport, TransportEvent, Window};

/// Production [`Transport`] over an X server connection.
pub struct X11Transport {
    conn: RustConnection,
    window: Window,
    atoms: Atoms,
}

impl X11Transport {
    /// Connect to the X server, create the mailbox window, and intern the
    /// full identifier registry.
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(display)?;
        let screen = &conn.setup().roots[screen_num];

        let window = conn.generate_id()?;
        conn.create_window(
            0, // InputOnly windows have depth 0
            window,
            screen.root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_ONLY,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new().event_mask(EventMask::PROPERTY_CHANGE),
        )?;

        let atoms = intern_atoms(&conn)?;
        conn.flush()?;
        debug!(window, "mailbox window created");

        Ok(Self {
            conn,
            window,
            atoms,
        })
    }

    /// The interned identifier registry.
    pub fn atoms(&self) -> &Atoms {
        &self.atoms
    }
}

/// Resolve every name the protocol speaks, in one pipelined batch: all
/// requests go out first, then the replies are collected.
fn intern_atoms(conn: &RustConnection) -> Result<Atoms> {
    let copy = conn.intern_atom(false, atoms::COPY_NAME.as_bytes())?;
    let paste = conn.intern_atom(false, atoms::PASTE_NAME.as_bytes())?;
    let primary = conn.intern_atom(false, b"PRIMARY")?;
    let text = conn.intern_atom(false, b"TEXT")?;
    let string = conn.intern_atom(false, b"STRING")?;
    let utf8_string = conn.intern_atom(false, b"UTF8_STRING")?;
    let marker = conn.intern_atom(false, atoms::MARKER_NAME.as_bytes())?;
    let atom = conn.intern_atom(false, b"ATOM")?;
    let targets = conn.intern_atom(false, b"TARGETS")?;

    let register_cookies = (0..REGISTER_COUNT)
        .map(|index| {
            let name = atoms::register_name(index as u8);
            conn.intern_atom(false, name.as_bytes())
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut registers = Box::new([0; REGISTER_COUNT]);
    for (slot, cookie) in registers.iter_mut().zip(register_cookies) {
        *slot = cookie.reply()?.atom;
    }

    Ok(Atoms {
        copy: copy.reply()?.atom,
        paste: paste.reply()?.atom,
        primary: primary.reply()?.atom,
        text: text.reply()?.atom,
        string: string.reply()?.atom,
        utf8_string: utf8_string.reply()?.atom,
        marker: marker.reply()?.atom,
        atom: atom.reply()?.atom,
        targets: targets.reply()?.atom,
        registers,
    })
}

fn atom_or_none(atom: Atom) -> Option<Atom> {
    (atom != x11rb::NONE).then_some(atom)
}

/// Decode a raw X event into the transport event the daemon routes on.
pub(crate) fn decode_event(event: &Event) -> TransportEvent {
    match event {
        Event::ClientMessage(ev) if ev.format == 32 => TransportEvent::Command {
            kind: ev.type_,
            index: ev.data.as_data32()[0],
        },
        Event::SelectionNotify(ev) => TransportEvent::ConversionDone {
            property: atom_or_none(ev.property),
        },
        Event::SelectionRequest(ev) => TransportEvent::ContentRequest(ContentRequest {
            requestor: ev.requestor,
            selection: ev.selection,
            target: ev.target,
            property: atom_or_none(ev.property),
            time: ev.time,
        }),
        Event::SelectionClear(ev) => TransportEvent::SelectionLost {
            selection: ev.selection,
        },
        _ => TransportEvent::Ignored,
    }
}

impl Transport for X11Transport {
    fn mailbox(&self) -> Window {
        self.window
    }

    fn claim_selection(&mut self, selection: Atom) -> Result<()> {
        self.conn
            .set_selection_owner(self.window, selection, x11rb::CURRENT_TIME)?;
        Ok(())
    }

    fn selection_owner(&mut self, selection: Atom) -> Result<Option<Window>> {
        let owner = self.conn.get_selection_owner(selection)?.reply()?.owner;
        Ok((owner != x11rb::NONE).then_some(owner))
    }

    fn send_command(&mut self, daemon: Window, command: Atom, index: u32) -> Result<()> {
        let message = ClientMessageEvent::new(32, daemon, command, [index, 0, 0, 0, 0]);
        self.conn
            .send_event(false, daemon, EventMask::NO_EVENT, message)?;
        Ok(())
    }

    fn request_conversion(
        &mut self,
        selection: Atom,
        target: Atom,
        destination: Atom,
    ) -> Result<()> {
        self.conn.convert_selection(
            self.window,
            selection,
            target,
            destination,
            x11rb::CURRENT_TIME,
        )?;
        Ok(())
    }

    fn read_property(&mut self, property: Atom) -> Result<Option<Vec<u8>>> {
        let reply = self
            .conn
            .get_property(false, self.window, property, AtomEnum::ANY, 0, u32::MAX)?
            .reply()?;
        Ok((!reply.value.is_empty()).then_some(reply.value))
    }

    fn delete_property(&mut self, property: Atom) -> Result<()> {
        self.conn.delete_property(self.window, property)?;
        Ok(())
    }

    fn write_bytes(
        &mut self,
        window: Window,
        property: Atom,
        kind: Atom,
        data: &[u8],
    ) -> Result<()> {
        self.conn
            .change_property8(PropMode::REPLACE, window, property, kind, data)?;
        Ok(())
    }

    fn write_atoms(&mut self, window: Window, property: Atom, atoms: &[Atom]) -> Result<()> {
        self.conn
            .change_property32(PropMode::REPLACE, window, property, self.atoms.atom, atoms)?;
        Ok(())
    }

    fn send_reply(&mut self, reply: &ConversionReply) -> Result<()> {
        let notify = SelectionNotifyEvent {
            response_type: SELECTION_NOTIFY_EVENT,
            sequence: 0,
            time: reply.time,
            requestor: reply.requestor,
            selection: reply.selection,
            target: reply.target,
            property: reply.property.unwrap_or(x11rb::NONE),
        };
        self.conn
            .send_event(false, reply.requestor, EventMask::NO_EVENT, notify)?;
        Ok(())
    }

    fn wait_event(&mut self) -> Result<TransportEvent> {
        let event = self.conn.wait_for_event()?;
        Ok(decode_event(&event))
    }

    fn flush(&mut self) -> Result<()> {
        self.conn.flush()?;
        Ok(())
    }
}
