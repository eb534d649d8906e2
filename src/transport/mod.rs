//! Transport seam between the protocol core and the windowing system.
//!
//! The daemon, the client, and their tests are written against the
//! [`Transport`] trait; [`x11`] provides the production implementation.
//! Events arrive already decoded into [`TransportEvent`] so the dispatch
//! loop routes by an exhaustive `match` instead of inspecting raw wire
//! structures.

use crate::atoms::Atom;
use crate::error::Result;

pub mod x11;

#[cfg(test)]
pub(crate) mod fake;

/// A window (mailbox) identifier assigned by the windowing system.
pub type Window = u32;

/// A transport event, decoded and routed by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// An inbound command message from a client invocation.
    Command {
        /// Message type atom identifying the command
        kind: Atom,
        /// Raw 32-bit register index; the receiver reduces it modulo 256
        index: u32,
    },
    /// Completion of a content conversion we requested earlier.
    /// `property` is `None` when the selection owner refused.
    ConversionDone {
        /// Destination property carrying the converted bytes
        property: Option<Atom>,
    },
    /// A third-party requester asking to read the selection we own.
    ContentRequest(ContentRequest),
    /// We lost exclusive ownership of a selection to another process.
    SelectionLost {
        /// The selection that was taken over
        selection: Atom,
    },
    /// Any event kind the daemon does not handle.
    Ignored,
}

/// A third-party request to read the currently owned selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    /// Window of the requesting process
    pub requestor: Window,
    /// Selection being read
    pub selection: Atom,
    /// Requested content type
    pub target: Atom,
    /// Property to place the result in; absent in legacy requests
    pub property: Option<Atom>,
    /// Request timestamp, echoed in the reply
    pub time: u32,
}

impl ContentRequest {
    /// The property the response must be written to. A request with an
    /// empty property field negotiates the requested target as the
    /// property; the substitution is mandated by the selection protocol.
    pub fn negotiated_property(&self) -> Atom {
        self.property.unwrap_or(self.target)
    }
}

/// The notify completion answering a [`ContentRequest`].
///
/// Sent unconditionally: a refusal (`property == None`) is itself a valid,
/// required completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReply {
    /// Requesting window the notify is delivered to
    pub requestor: Window,
    /// Selection, echoed from the request
    pub selection: Atom,
    /// Target, echoed from the request
    pub target: Atom,
    /// Negotiated property, or `None` to refuse
    pub property: Option<Atom>,
    /// Timestamp, echoed from the request
    pub time: u32,
}

impl ConversionReply {
    /// Build the reply scaffold for a request: requestor, selection,
    /// target, and time are echoed; the property is the negotiated one.
    pub fn answering(request: &ContentRequest) -> Self {
        Self {
            requestor: request.requestor,
            selection: request.selection,
            target: request.target,
            property: Some(request.negotiated_property()),
            time: request.time,
        }
    }

    /// Turn this reply into a refusal.
    pub fn refused(mut self) -> Self {
        self.property = None;
        self
    }
}

/// The narrow windowing-system interface the protocol core depends on.
///
/// Implementations own the connection and this process's mailbox window.
/// All calls are synchronous; the daemon is a single-threaded blocking
/// loop and the exclusive-ownership claim below is its only cross-process
/// synchronization primitive.
pub trait Transport {
    /// This process's mailbox window identifier.
    fn mailbox(&self) -> Window;

    /// Claim exclusive ownership of `selection`. Claims are atomic and
    /// totally ordered by the server; the last successful claim wins.
    fn claim_selection(&mut self, selection: Atom) -> Result<()>;

    /// The current owner of `selection`, if anyone owns it.
    fn selection_owner(&mut self, selection: Atom) -> Result<Option<Window>>;

    /// Deliver a fire-and-forget command message to a daemon mailbox.
    fn send_command(&mut self, daemon: Window, command: Atom, index: u32) -> Result<()>;

    /// Ask the current owner of `selection` to convert its content to
    /// `target` form into `destination` on our mailbox.
    fn request_conversion(&mut self, selection: Atom, target: Atom, destination: Atom)
        -> Result<()>;

    /// Read the full value of `property` on our mailbox; `None` when the
    /// property does not exist or carries no data.
    fn read_property(&mut self, property: Atom) -> Result<Option<Vec<u8>>>;

    /// Delete `property` on our mailbox, reclaiming server-side state.
    fn delete_property(&mut self, property: Atom) -> Result<()>;

    /// Write `data` to `property` on `window`, typed as `kind`.
    fn write_bytes(&mut self, window: Window, property: Atom, kind: Atom, data: &[u8])
        -> Result<()>;

    /// Write an identifier list to `property` on `window`.
    fn write_atoms(&mut self, window: Window, property: Atom, atoms: &[Atom]) -> Result<()>;

    /// Send a conversion reply back to its requestor.
    fn send_reply(&mut self, reply: &ConversionReply) -> Result<()>;

    /// Block until the next event arrives.
    fn wait_event(&mut self) -> Result<TransportEvent>;

    /// Flush pending outbound work to the server.
    fn flush(&mut self) -> Result<()>;
}
