//! The option region of an NDISC message.
//!
//! ```txt
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     Type      |    Length     |              ...              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ~                              ...                              ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Length counts the whole option, Type and Length included, in units of 8
//! bytes. See [RFC 4861 § 4.6].
//!
//! [RFC 4861 § 4.6]: https://tools.ietf.org/html/rfc4861#section-4.6

use alloc::{sync::Arc, vec::Vec};
use core::{fmt, ops::DerefMut, ops::Range, slice};

use ndisc_error::{DecodeErrorKind, EncodeErrorKind};
use ndisc_storage::{Buf, RawPacket, Shared, Storage};

use super::option::{NdOption, Type};

const UNIT: usize = 8;
const OPT_HEADER_LEN: usize = 2;

/// A single option as found on the wire. `data` excludes the Type and Length
/// fields.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Opt<'a> {
    pub kind: Type,
    pub data: &'a [u8],
}

impl<'a> Opt<'a> {
    /// The Length field this option encodes to.
    pub fn length(&self) -> Result<u8, EncodeErrorKind> {
        let total = self.data.len() + OPT_HEADER_LEN;
        if total % UNIT != 0 {
            return Err(EncodeErrorKind::UnalignedOption);
        }
        u8::try_from(total / UNIT).map_err(|_| EncodeErrorKind::OptionTooLong)
    }

    pub fn parse(&self) -> Result<NdOption<'a>, DecodeErrorKind> {
        NdOption::parse(self.kind, self.data)
    }
}

/// Split the first option off a non-empty option region.
pub fn split(region: &[u8]) -> Result<(Opt<'_>, &[u8]), DecodeErrorKind> {
    let (&[kind, length], _) = region
        .split_first_chunk::<OPT_HEADER_LEN>()
        .ok_or(DecodeErrorKind::Truncated)?;
    // A zero length would never advance.
    if length == 0 {
        return Err(DecodeErrorKind::MalformedOption);
    }

    let total = usize::from(length) * UNIT;
    let data = region
        .get(OPT_HEADER_LEN..total)
        .ok_or(DecodeErrorKind::Truncated)?;
    Ok((Opt { kind: Type::from(kind), data }, &region[total..]))
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
struct Entry {
    kind: u8,
    start: usize,
    len: usize,
}

impl Entry {
    fn view<'a>(&self, bytes: &'a [u8]) -> Opt<'a> {
        Opt {
            kind: Type::from(self.kind),
            data: &bytes[self.start..self.start + self.len],
        }
    }
}

/// Ordered options of one message, in wire order, duplicates kept.
///
/// Entries are offsets into a handle of the message storage, so options are
/// never copied out of the packet.
#[derive(Clone)]
pub struct OptionSet<S: Storage = Shared> {
    storage: S,
    entries: Vec<Entry>,
}

impl OptionSet {
    pub fn builder() -> Builder {
        Builder::new()
    }
}

impl<S: Storage> OptionSet<S> {
    /// Parse the options found in `storage[range]`.
    pub fn parse(storage: S, range: Range<usize>) -> Result<Self, DecodeErrorKind> {
        let base = range.start;
        let region = storage.get(range).ok_or(DecodeErrorKind::Truncated)?;

        let mut entries = Vec::new();
        let mut rest = region;
        while !rest.is_empty() {
            let offset = region.len() - rest.len();
            let (opt, next) = split(rest)?;
            entries.push(Entry {
                kind: opt.kind.into(),
                start: base + offset + OPT_HEADER_LEN,
                len: opt.data.len(),
            });
            rest = next;
        }

        Ok(OptionSet { storage, entries })
    }

    /// Parse the options following a fixed header of `header_len` bytes.
    pub fn from_packet(packet: &RawPacket<S>, header_len: usize) -> Result<Self, DecodeErrorKind> {
        Self::parse(packet.storage().clone(), packet.option_range(header_len))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, index: usize) -> Option<Opt<'_>> {
        self.entries.get(index).map(|e| e.view(&self.storage))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bytes: &self.storage,
            entries: self.entries.iter(),
        }
    }

    /// Options of one kind, in wire order.
    pub fn by_kind(&self, kind: Type) -> ByKind<'_> {
        ByKind { iter: self.iter(), kind }
    }

    pub fn first(&self, kind: Type) -> Option<Opt<'_>> {
        self.by_kind(kind).next()
    }

    pub fn contains(&self, kind: Type) -> bool {
        self.first(kind).is_some()
    }

    /// Typed options of one kind. Options whose content does not fit their
    /// kind are skipped.
    pub fn parsed(&self, kind: Type) -> impl Iterator<Item = NdOption<'_>> + Clone + '_ {
        self.by_kind(kind).filter_map(|opt| match opt.parse() {
            Ok(opt) => Some(opt),
            Err(_err) => {
                #[cfg(feature = "log")]
                tracing::trace!(kind = %opt.kind, len = opt.data.len(), "skipping option: {_err}");
                None
            }
        })
    }

    /// Bytes taken by all options on the wire.
    pub fn buffer_len(&self) -> Result<usize, EncodeErrorKind> {
        self.iter().try_fold(0, |acc, opt| {
            let length = opt.length()?;
            Ok(acc + usize::from(length) * UNIT)
        })
    }

    /// Append every option to `buf` in order.
    ///
    /// # Panics
    ///
    /// Panics if `buf` has less than [`buffer_len`](Self::buffer_len) bytes
    /// remaining.
    pub fn emit<B: DerefMut<Target = [u8]>>(&self, buf: &mut Buf<B>) -> Result<(), EncodeErrorKind> {
        for opt in self.iter() {
            let length = opt.length()?;
            let out = buf.append(usize::from(length) * UNIT);
            out[0] = opt.kind.into();
            out[1] = length;
            out[OPT_HEADER_LEN..].copy_from_slice(opt.data);
        }
        Ok(())
    }
}

impl<S: Storage, T: Storage> PartialEq<OptionSet<T>> for OptionSet<S> {
    fn eq(&self, other: &OptionSet<T>) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<S: Storage> Eq for OptionSet<S> {}

impl<S: Storage> fmt::Debug for OptionSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, S: Storage> IntoIterator for &'a OptionSet<S> {
    type Item = Opt<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Iter<'a> {
    bytes: &'a [u8],
    entries: slice::Iter<'a, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Opt<'a>;

    fn next(&mut self) -> Option<Opt<'a>> {
        self.entries.next().map(|e| e.view(self.bytes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back().map(|e| e.view(self.bytes))
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[derive(Debug, Clone)]
pub struct ByKind<'a> {
    iter: Iter<'a>,
    kind: Type,
}

impl<'a> Iterator for ByKind<'a> {
    type Item = Opt<'a>;

    fn next(&mut self) -> Option<Opt<'a>> {
        let kind = self.kind;
        self.iter.find(|opt| opt.kind == kind)
    }
}

/// Accumulates options for a message under construction.
#[derive(Debug, Default, Clone)]
pub struct Builder {
    bytes: Vec<u8>,
    entries: Vec<Entry>,
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    pub fn push(mut self, opt: NdOption<'_>) -> Self {
        let start = self.bytes.len();
        let len = opt.buffer_len() - OPT_HEADER_LEN;
        self.bytes.resize(start + len, 0);
        opt.emit(&mut self.bytes[start..]);
        self.entries.push(Entry { kind: opt.kind().into(), start, len });
        self
    }

    /// Push option data as is. Its length is only checked when emitted.
    pub fn push_raw(mut self, kind: Type, data: &[u8]) -> Self {
        let start = self.bytes.len();
        self.bytes.extend_from_slice(data);
        self.entries.push(Entry {
            kind: kind.into(),
            start,
            len: data.len(),
        });
        self
    }

    pub fn build(self) -> OptionSet<Shared> {
        OptionSet {
            storage: Arc::from(self.bytes),
            entries: self.entries,
        }
    }
}
