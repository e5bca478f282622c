use bytes::{Buf, Bytes};

/// One piece of an outgoing chunked body: either data, or the last (zero-size) chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkItem<D: Buf = Bytes> {
    Data(D),
    Last,
}

impl<D: Buf> ChunkItem<D> {
    /// Payload size of this chunk, `0` for the last chunk.
    pub fn size(&self) -> usize {
        match self {
            ChunkItem::Data(data) => data.remaining(),
            ChunkItem::Last => 0,
        }
    }
}
