//! The per-sequence frame pipeline.
//!
//! Drives one recording end to end: frames are pulled from the source in
//! temporal order, run through the auto-exposure controller and the color
//! mapper, upscaled, and appended to the video sink. The sink is finalized
//! exactly once on success; on any failure the error propagates to the
//! conversion driver and the sink is left unfinalized, so its drop handler
//! can discard the partial output.

use log::trace;

use crate::colormap::Colormap;
use crate::error::{CoreError, CoreResult};
use crate::exposure::ExposureWindow;
use crate::render::{render_frame, upscale};
use crate::sink::VideoSink;
use crate::source::FrameSource;

/// Statistics for one successfully converted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceStats {
    /// Number of frames encoded.
    pub frames: u64,
}

/// Converts one frame sequence, writing every rendered frame to the sink in
/// source order and finalizing the sink on success.
///
/// A source that produces no frames at all is reported as
/// [`CoreError::NoFrames`] without finalizing the sink; an empty MP4 is not
/// a useful artifact and would be indistinguishable from a successful
/// conversion.
pub fn convert_sequence<S: FrameSource, K: VideoSink>(
    source: &mut S,
    sink: &mut K,
    colormap: &Colormap,
) -> CoreResult<SequenceStats> {
    let mut window = ExposureWindow::new();
    let mut frames: u64 = 0;

    while let Some(frame) = source.next_frame()? {
        let bounds = window.update(frame.min(), frame.max());
        let image = render_frame(&frame, bounds, colormap);
        let image = upscale(&image);
        sink.next_frame(&image)?;
        frames += 1;
        trace!(
            "frame {} window ({:.2}, {:.2})",
            frames, bounds.0, bounds.1
        );
    }

    if frames == 0 {
        return Err(CoreError::NoFrames);
    }

    sink.close()?;
    Ok(SequenceStats { frames })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};
    use image::RgbImage;

    use super::*;
    use crate::source::{Frame, SequenceInfo};

    struct VecSource {
        info: SequenceInfo,
        frames: Vec<Frame>,
        next: usize,
        fail_at: Option<usize>,
    }

    impl VecSource {
        fn new(frames: Vec<Frame>) -> Self {
            let (width, height) = frames
                .first()
                .map(|f| (f.width(), f.height()))
                .unwrap_or((2, 2));
            Self {
                info: SequenceInfo {
                    timestamp: Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap(),
                    device_name: None,
                    width,
                    height,
                    frame_rate: 9,
                },
                frames,
                next: 0,
                fail_at: None,
            }
        }
    }

    impl FrameSource for VecSource {
        fn info(&self) -> &SequenceInfo {
            &self.info
        }

        fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
            if Some(self.next) == self.fail_at {
                return Err(CoreError::SourceRead {
                    path: "synthetic".into(),
                    message: "injected failure".into(),
                });
            }
            let frame = self.frames.get(self.next).cloned();
            self.next += 1;
            Ok(frame)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum SinkEvent {
        Frame(u32, u32),
        Closed,
        Aborted,
    }

    struct RecordingSink {
        events: Rc<RefCell<Vec<SinkEvent>>>,
        fail_on_frame: Option<usize>,
        frames_seen: usize,
        closed: bool,
    }

    impl RecordingSink {
        fn new(events: Rc<RefCell<Vec<SinkEvent>>>) -> Self {
            Self {
                events,
                fail_on_frame: None,
                frames_seen: 0,
                closed: false,
            }
        }
    }

    impl VideoSink for RecordingSink {
        fn next_frame(&mut self, image: &RgbImage) -> CoreResult<()> {
            self.frames_seen += 1;
            if Some(self.frames_seen) == self.fail_on_frame {
                return Err(CoreError::SinkWrite("injected sink failure".into()));
            }
            self.events
                .borrow_mut()
                .push(SinkEvent::Frame(image.width(), image.height()));
            Ok(())
        }

        fn close(&mut self) -> CoreResult<()> {
            self.closed = true;
            self.events.borrow_mut().push(SinkEvent::Closed);
            Ok(())
        }
    }

    impl Drop for RecordingSink {
        fn drop(&mut self) {
            if !self.closed {
                self.events.borrow_mut().push(SinkEvent::Aborted);
            }
        }
    }

    fn gradient_frame(offset: f32) -> Frame {
        Frame::new(2, 2, vec![offset, offset + 1.0, offset + 2.0, offset + 3.0]).unwrap()
    }

    #[test]
    fn frames_arrive_in_order_and_scaled() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut source =
            VecSource::new(vec![gradient_frame(0.0), gradient_frame(5.0), gradient_frame(9.0)]);
        let mut sink = RecordingSink::new(Rc::clone(&events));

        let stats = convert_sequence(&mut source, &mut sink, Colormap::built_in()).unwrap();
        assert_eq!(stats.frames, 3);
        drop(sink);

        // Exactly three frames at 4x the native 2x2 size, then one close.
        assert_eq!(
            *events.borrow(),
            vec![
                SinkEvent::Frame(8, 8),
                SinkEvent::Frame(8, 8),
                SinkEvent::Frame(8, 8),
                SinkEvent::Closed,
            ]
        );
    }

    #[test]
    fn empty_source_reports_no_frames() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut source = VecSource::new(vec![]);
        let mut sink = RecordingSink::new(Rc::clone(&events));

        let result = convert_sequence(&mut source, &mut sink, Colormap::built_in());
        assert!(matches!(result, Err(CoreError::NoFrames)));
        drop(sink);

        // The sink was never finalized.
        assert_eq!(*events.borrow(), vec![SinkEvent::Aborted]);
    }

    #[test]
    fn sink_failure_aborts_without_finalizing() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut source =
            VecSource::new(vec![gradient_frame(0.0), gradient_frame(1.0), gradient_frame(2.0)]);
        let mut sink = RecordingSink::new(Rc::clone(&events));
        sink.fail_on_frame = Some(2);

        let result = convert_sequence(&mut source, &mut sink, Colormap::built_in());
        assert!(matches!(result, Err(CoreError::SinkWrite(_))));
        drop(sink);

        // One good frame, then cleanup; never Closed.
        assert_eq!(
            *events.borrow(),
            vec![SinkEvent::Frame(8, 8), SinkEvent::Aborted]
        );
    }

    #[test]
    fn source_failure_propagates() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut source = VecSource::new(vec![gradient_frame(0.0), gradient_frame(1.0)]);
        source.fail_at = Some(1);
        let mut sink = RecordingSink::new(Rc::clone(&events));

        let result = convert_sequence(&mut source, &mut sink, Colormap::built_in());
        assert!(matches!(result, Err(CoreError::SourceRead { .. })));
        drop(sink);
        assert_eq!(
            *events.borrow(),
            vec![SinkEvent::Frame(8, 8), SinkEvent::Aborted]
        );
    }
}
