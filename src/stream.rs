use crate::types::Frame;
use crate::{NatNetError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::time::Duration;

/// Receiving end of frames delivered to a [`Client::frame_stream`] callback.
///
/// The stream stops once another data callback replaces the one feeding it.
///
/// [`Client::frame_stream`]: crate::Client::frame_stream
pub struct FrameStream {
    receiver: Receiver<Frame>,
}

/// Sending half owned by the registered callback.
pub(crate) struct FrameSender {
    sender: Sender<Frame>,
}

impl FrameSender {
    /// Queue a frame, dropping it if the consumer is behind.
    pub fn forward(&self, frame: Frame) {
        if let Err(e) = self.sender.try_send(frame) {
            match e {
                crossbeam_channel::TrySendError::Full(f) => {
                    log::trace!("Frame channel full, dropping frame {}", f.frame_number);
                }
                crossbeam_channel::TrySendError::Disconnected(_) => {
                    log::trace!("Frame stream dropped, discarding frame");
                }
            }
        }
    }
}

impl FrameStream {
    pub(crate) fn channel(capacity: usize) -> (FrameSender, FrameStream) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));
        (FrameSender { sender }, FrameStream { receiver })
    }

    /// Receive the next frame (blocks until available).
    pub fn recv(&self) -> Result<Frame> {
        self.receiver.recv().map_err(|_| NatNetError::StreamStopped)
    }

    /// Try to receive a frame without blocking.
    pub fn try_recv(&self) -> Option<Frame> {
        self.receiver.try_recv().ok()
    }

    /// Receive a frame with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Frame> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            crossbeam_channel::RecvTimeoutError::Timeout => NatNetError::Timeout,
            crossbeam_channel::RecvTimeoutError::Disconnected => NatNetError::StreamStopped,
        })
    }

    /// Frames currently queued.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockClient, NativeFrame};
    use crate::Client;

    #[test]
    fn test_stream_receives_frames() {
        let client = Client::with_native(MockClient::new());
        let stream = client.frame_stream_with_capacity(4);

        client.native().deliver(&NativeFrame::new(10));
        client.native().deliver_from_thread(NativeFrame::new(11)).join().unwrap();

        assert_eq!(stream.len(), 2);
        assert_eq!(stream.recv().unwrap().frame_number, 10);
        assert_eq!(
            stream.recv_timeout(Duration::from_secs(1)).unwrap().frame_number,
            11
        );
        assert!(stream.try_recv().is_none());
        assert!(matches!(
            stream.recv_timeout(Duration::from_millis(10)),
            Err(NatNetError::Timeout)
        ));
    }

    #[test]
    fn test_full_stream_drops_newest() {
        let client = Client::with_native(MockClient::new());
        let stream = client.frame_stream_with_capacity(1);

        client.native().deliver(&NativeFrame::new(1));
        client.native().deliver(&NativeFrame::new(2));

        assert_eq!(stream.recv().unwrap().frame_number, 1);
        assert!(stream.is_empty());
    }

    #[test]
    fn test_replaced_stream_stops() {
        let client = Client::with_native(MockClient::new());
        let stream = client.frame_stream_with_capacity(4);
        client.native().deliver(&NativeFrame::new(1));

        client.set_data_callback(|_| {});

        assert_eq!(stream.recv().unwrap().frame_number, 1);
        assert!(matches!(stream.recv(), Err(NatNetError::StreamStopped)));
    }
}
