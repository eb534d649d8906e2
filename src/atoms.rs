//! Interned identifier registry.
//!
//! Every name the protocol speaks - the command message types, the daemon
//! marker, the supported content-type targets, and one destination atom per
//! register - is resolved to a server-assigned atom exactly once at startup
//! and never changes for the process lifetime.

/// A server-interned identifier.
pub type Atom = u32;

/// Number of addressable registers.
pub const REGISTER_COUNT: usize = 256;

/// Atom name for the COPY command message type.
pub const COPY_NAME: &str = "SELREG_COPY";
/// Atom name for the PASTE command message type.
pub const PASTE_NAME: &str = "SELREG_PASTE";
/// Atom name for the daemon marker selection.
pub const MARKER_NAME: &str = "SELREG_DAEMON";

/// Atom name for a register's conversion-destination property.
pub fn register_name(index: u8) -> String {
    format!("SELREG_R{index}")
}

/// The full set of interned atoms.
///
/// Values are pairwise distinct and stable once interned; the daemon, the
/// client, and the transport all read from the same instance.
#[derive(Debug, Clone)]
pub struct Atoms {
    /// COPY command message type
    pub copy: Atom,
    /// PASTE command message type
    pub paste: Atom,
    /// The shared PRIMARY selection
    pub primary: Atom,
    /// TEXT content target
    pub text: Atom,
    /// STRING content target
    pub string: Atom,
    /// UTF8_STRING content target
    pub utf8_string: Atom,
    /// Daemon marker selection
    pub marker: Atom,
    /// ATOM, the type tag for target lists
    pub atom: Atom,
    /// TARGETS, the "list supported targets" query
    pub targets: Atom,
    /// Conversion-destination atom per register slot
    pub registers: Box<[Atom; REGISTER_COUNT]>,
}

impl Atoms {
    /// Destination atom for register `index`.
    pub fn register(&self, index: u8) -> Atom {
        self.registers[index as usize]
    }

    /// Whether `target` is one of the supported plain-text variants.
    pub fn is_text_target(&self, target: Atom) -> bool {
        target == self.text || target == self.string || target == self.utf8_string
    }

    /// The fixed set of targets a content request may ask for.
    pub fn supported_targets(&self) -> [Atom; 3] {
        [self.text, self.string, self.utf8_string]
    }
}
