use waystage_core::{
    EdgeBasedNodeId, EdgeId, MonthDay, NodeId, NodeMapping, TimeSpan, Weekday,
};

/// A value with a fixed on-disk width, stored field by field in native byte
/// order with no padding.
pub trait FixedSize: Sized {
    const SIZE: usize;

    /// `out` is exactly `Self::SIZE` bytes.
    fn encode(&self, out: &mut [u8]);

    /// `bytes` is exactly `Self::SIZE` bytes.
    fn decode(bytes: &[u8]) -> Self;
}

macro_rules! impl_fixed_size_int {
    ($($t:ty),* $(,)?) => {$(
        impl FixedSize for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            fn encode(&self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            fn decode(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                <$t>::from_ne_bytes(raw)
            }
        }
    )*};
}

impl_fixed_size_int!(u8, u16, u32, u64, i32);

macro_rules! impl_fixed_size_newtype {
    ($($t:ident($inner:ty)),* $(,)?) => {$(
        impl FixedSize for $t {
            const SIZE: usize = <$inner as FixedSize>::SIZE;

            fn encode(&self, out: &mut [u8]) {
                self.0.encode(out);
            }

            fn decode(bytes: &[u8]) -> Self {
                $t(<$inner>::decode(bytes))
            }
        }
    )*};
}

impl_fixed_size_newtype!(NodeId(u32), EdgeId(u32), EdgeBasedNodeId(u32), Weekday(u8));

impl FixedSize for NodeMapping {
    const SIZE: usize = 8;

    fn encode(&self, out: &mut [u8]) {
        self.node_based.encode(&mut out[0..4]);
        self.edge_based.encode(&mut out[4..8]);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            node_based: NodeId::decode(&bytes[0..4]),
            edge_based: EdgeBasedNodeId::decode(&bytes[4..8]),
        }
    }
}

impl FixedSize for TimeSpan {
    const SIZE: usize = 8;

    fn encode(&self, out: &mut [u8]) {
        self.from.encode(&mut out[0..4]);
        self.to.encode(&mut out[4..8]);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            from: u32::decode(&bytes[0..4]),
            to: u32::decode(&bytes[4..8]),
        }
    }
}

impl FixedSize for MonthDay {
    const SIZE: usize = 2;

    fn encode(&self, out: &mut [u8]) {
        out[0] = self.month;
        out[1] = self.day;
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            month: bytes[0],
            day: bytes[1],
        }
    }
}
