//! Input read buffer (IRb).

use shellflow::{Error, Stream};
use shellflow_std::axis::AxisChunk;

use crate::types::tcp::SessionId;

/// Moves the data and metadata of the TOE into the input read buffer.
///
/// Every chunk entering the buffer emits one enqueue signal to the occupancy tracker. The buffer
/// itself is the `data` stream handed over to the read path, which emits the matching dequeue
/// signals.
#[derive(Debug, Clone, Default)]
pub struct InputReadBuffer;

impl InputReadBuffer {
    /// Creates a new input read buffer.
    pub fn new() -> Self { Self }

    /// Runs one cycle.
    pub fn tick(
        &mut self, shl_data: &mut Stream<AxisChunk>, shl_meta: &mut Stream<SessionId>, data: &mut Stream<AxisChunk>,
        meta: &mut Stream<SessionId>, enq: &mut Stream<()>,
    ) -> Result<(), Error> {
        if !shl_meta.is_empty() && !meta.is_full() {
            meta.write(shl_meta.read()?)?;
        }
        if !shl_data.is_empty() && !data.is_full() && !enq.is_full() {
            data.write(shl_data.read()?)?;
            enq.write(())?;
        }
        Ok(())
    }
}
