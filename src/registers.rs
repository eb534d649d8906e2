//! The register store: 256 fixed content slots plus the active-register
//! reference.
//!
//! Slots are allocated once at startup and never individually destroyed.
//! Content buffers are owned exclusively by the store and replaced whole;
//! serving a buffer to a requester copies bytes out, the buffer itself is
//! never handed over.

use crate::atoms::{Atom, Atoms, REGISTER_COUNT};

/// One addressable content slot.
#[derive(Debug)]
pub struct Register {
    identity: Atom,
    content: Option<Vec<u8>>,
}

impl Register {
    /// The slot's conversion-destination atom, fixed at startup.
    pub fn identity(&self) -> Atom {
        self.identity
    }

    /// The stored bytes, if any copy has completed for this slot.
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }
}

/// Owner of the 256 register slots and the single active-register reference.
///
/// The active reference is a slot index, not an owner of the content; only
/// the register it names may answer third-party content requests.
#[derive(Debug)]
pub struct RegisterStore {
    slots: Vec<Register>,
    active: Option<u8>,
}

impl RegisterStore {
    /// Allocate all slots, one per register atom.
    pub fn new(atoms: &Atoms) -> Self {
        let slots = atoms
            .registers
            .iter()
            .map(|&identity| Register {
                identity,
                content: None,
            })
            .collect();
        Self {
            slots,
            active: None,
        }
    }

    /// The register at `index`. The `u8` index is in range by construction;
    /// callers reduce the wire's 32-bit word modulo 256 first.
    pub fn get(&self, index: u8) -> &Register {
        &self.slots[index as usize]
    }

    /// Correlate an inbound conversion reply back to its slot by the
    /// destination identity. Linear scan over the fixed slot array.
    pub fn find_by_identity(&self, identity: Atom) -> Option<u8> {
        self.slots
            .iter()
            .position(|register| register.identity == identity)
            .map(|index| index as u8)
    }

    /// Replace the content of `index`, dropping any previous buffer.
    pub fn set_content(&mut self, index: u8, bytes: Vec<u8>) {
        self.slots[index as usize].content = Some(bytes);
    }

    /// Mark `index` as the register serving the shared selection.
    pub fn activate(&mut self, index: u8) {
        self.active = Some(index);
    }

    /// Drop the active-register reference.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// The register currently serving requests, if any.
    pub fn active(&self) -> Option<&Register> {
        self.active.map(|index| &self.slots[index as usize])
    }

    /// Index of the active register, if any.
    pub fn active_index(&self) -> Option<u8> {
        self.active
    }
}
