//! Vendor gateway - the capability a concrete integration plugs into the
//! collector.
//!
//! Both calls may hit the network. Either may be repeated after a crash, so
//! implementations must be safe to call again with the same input.

use crate::{transport::TransportError, Record};

/// Source of the remote catalog and per-item transform.
pub trait VendorGateway {
    /// Fetch the complete, ordered catalog.
    fn full_list(&mut self) -> Result<Vec<Record>, TransportError>;

    /// Collect (fetch and transform) the artifact for one catalog entry.
    fn collect_item(&mut self, item: &Record) -> Result<Record, TransportError>;
}

impl<G: VendorGateway + ?Sized> VendorGateway for &mut G {
    fn full_list(&mut self) -> Result<Vec<Record>, TransportError> {
        (**self).full_list()
    }

    fn collect_item(&mut self, item: &Record) -> Result<Record, TransportError> {
        (**self).collect_item(item)
    }
}

impl<G: VendorGateway + ?Sized> VendorGateway for Box<G> {
    fn full_list(&mut self) -> Result<Vec<Record>, TransportError> {
        (**self).full_list()
    }

    fn collect_item(&mut self, item: &Record) -> Result<Record, TransportError> {
        (**self).collect_item(item)
    }
}

/// Gateway built from a pair of closures.
pub struct FnGateway<L, C> {
    list: L,
    collect: C,
}

impl<L, C> FnGateway<L, C>
where
    L: FnMut() -> Result<Vec<Record>, TransportError>,
    C: FnMut(&Record) -> Result<Record, TransportError>,
{
    pub fn new(list: L, collect: C) -> Self {
        Self { list, collect }
    }
}

impl<L, C> VendorGateway for FnGateway<L, C>
where
    L: FnMut() -> Result<Vec<Record>, TransportError>,
    C: FnMut(&Record) -> Result<Record, TransportError>,
{
    fn full_list(&mut self) -> Result<Vec<Record>, TransportError> {
        (self.list)()
    }

    fn collect_item(&mut self, item: &Record) -> Result<Record, TransportError> {
        (self.collect)(item)
    }
}

impl<L, C> std::fmt::Debug for FnGateway<L, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnGateway").finish_non_exhaustive()
    }
}
