use alloc::{sync::Arc, vec, vec::Vec};
use core::ops::DerefMut;

use crate::{Meta, RawPacket, Shared};

/// A packet under construction, filled front to back.
// INVARIANT: 0 <= len <= storage.len()
#[derive(Debug)]
pub struct Buf<S: DerefMut<Target = [u8]>> {
    len: usize,
    storage: S,
}

impl Buf<Vec<u8>> {
    /// A zeroed buffer of exactly `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Buf::new(vec![0; capacity])
    }

    /// Freeze the written bytes into a shared packet.
    pub fn into_packet(mut self, meta: Meta) -> RawPacket<Shared> {
        self.storage.truncate(self.len);
        RawPacket::new(Arc::from(self.storage), meta)
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        self.storage.truncate(self.len);
        self.storage
    }
}

impl<S: DerefMut<Target = [u8]>> Buf<S> {
    pub const fn new(storage: S) -> Self {
        Buf { len: 0, storage }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        self.storage.len() - self.len
    }

    pub fn data(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.storage[..self.len]
    }

    pub fn append(&mut self, size: usize) -> &mut [u8] {
        let remaining = self.remaining();
        assert!(
            size <= remaining,
            "append failed: size ({size}) must not exceed the remaining capacity ({remaining})",
        );
        let start = self.len;
        self.len += size;
        &mut self.storage[start..self.len]
    }

    pub fn append_slice(&mut self, slice: &[u8]) {
        self.append(slice.len()).copy_from_slice(slice);
    }
}

impl<S: DerefMut<Target = [u8]>> AsRef<[u8]> for Buf<S> {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}
