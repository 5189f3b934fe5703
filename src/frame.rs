//! Render loop state, kept free of any windowing or GL types.
//!
//! Window events are fed in with [`FrameLoop::handle_event`] between frames, and
//! [`FrameLoop::next_frame`] describes what the next frame has to do.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Resized { width: u32, height: u32 },
    Key { key: Key, pressed: bool },
    CloseRequested,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn covering(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub count: usize,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// Set before clearing when the window was resized since the last frame.
    pub viewport: Option<Viewport>,
    pub clear_color: [f32; 4],
    pub draw: DrawCall,
}

#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    clear_color: [f32; 4],
    vertex_count: usize,
    escape_down: bool,
    escape_latched: bool,
    pending_viewport: Option<Viewport>,
    frames: u64,
}

impl FrameLoop {
    pub fn new(clear_color: [f32; 4], vertex_count: usize) -> Self {
        Self {
            state: LoopState::Running,
            clear_color,
            vertex_count,
            escape_down: false,
            escape_latched: false,
            pending_viewport: None,
            frames: 0,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Resized { width, height } => {
                self.pending_viewport = Some(Viewport::covering(width, height));
            }
            AppEvent::Key {
                key: Key::Escape,
                pressed,
            } => {
                self.escape_down = pressed;
                // a press released before the next frame still counts
                self.escape_latched |= pressed;
            }
            AppEvent::Key { .. } => {}
            AppEvent::CloseRequested => {
                self.state = LoopState::Terminated;
            }
        }
    }

    /// The next frame to render, or `None` once the loop has terminated.
    ///
    /// Escape seen during this frame's input step lets the frame finish and
    /// terminates the loop right after it.
    pub fn next_frame(&mut self) -> Option<Frame> {
        if self.state == LoopState::Terminated {
            return None;
        }

        if self.escape_down || self.escape_latched {
            self.state = LoopState::Terminated;
        }
        self.escape_latched = false;

        self.frames += 1;

        Some(Frame {
            viewport: self.pending_viewport.take(),
            clear_color: self.clear_color,
            draw: DrawCall {
                count: self.vertex_count,
            },
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

    fn escape(pressed: bool) -> AppEvent {
        AppEvent::Key {
            key: Key::Escape,
            pressed,
        }
    }

    #[test]
    fn every_frame_draws_all_vertices_once() {
        let mut frame_loop = FrameLoop::new(CLEAR, 6);

        for _ in 0..100 {
            let frame = frame_loop.next_frame().unwrap();

            assert_eq!(frame.draw, DrawCall { count: 6 });
            assert_eq!(frame.clear_color, CLEAR);
            assert_eq!(frame.viewport, None);
        }

        assert_eq!(frame_loop.frames(), 100);
        assert_eq!(frame_loop.state(), LoopState::Running);
    }

    #[test]
    fn escape_finishes_current_frame_then_stops() {
        let mut frame_loop = FrameLoop::new(CLEAR, 6);
        frame_loop.next_frame().unwrap();

        frame_loop.handle_event(escape(true));

        assert!(frame_loop.next_frame().is_some());
        assert_eq!(frame_loop.state(), LoopState::Terminated);
        assert!(frame_loop.next_frame().is_none());
        assert_eq!(frame_loop.frames(), 2);
    }

    #[test]
    fn escape_tap_between_frames_counts() {
        let mut frame_loop = FrameLoop::new(CLEAR, 6);

        frame_loop.handle_event(escape(true));
        frame_loop.handle_event(escape(false));

        assert!(frame_loop.next_frame().is_some());
        assert!(frame_loop.next_frame().is_none());
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut frame_loop = FrameLoop::new(CLEAR, 6);

        frame_loop.handle_event(AppEvent::Key {
            key: Key::Other,
            pressed: true,
        });

        frame_loop.next_frame().unwrap();
        frame_loop.next_frame().unwrap();
        assert_eq!(frame_loop.state(), LoopState::Running);
    }

    #[test]
    fn close_request_stops_before_next_frame() {
        let mut frame_loop = FrameLoop::new(CLEAR, 6);
        frame_loop.next_frame().unwrap();

        frame_loop.handle_event(AppEvent::CloseRequested);

        assert!(frame_loop.next_frame().is_none());
        assert_eq!(frame_loop.frames(), 1);
    }

    #[test]
    fn escape_and_close_between_frames() {
        let mut frame_loop = FrameLoop::new(CLEAR, 6);
        frame_loop.next_frame().unwrap();

        frame_loop.handle_event(escape(true));
        frame_loop.handle_event(AppEvent::CloseRequested);

        assert!(frame_loop.next_frame().is_none());
        assert_eq!(frame_loop.state(), LoopState::Terminated);
        assert_eq!(frame_loop.frames(), 1);
    }

    #[test]
    fn resize_sets_viewport_once() {
        let mut frame_loop = FrameLoop::new(CLEAR, 6);

        frame_loop.handle_event(AppEvent::Resized {
            width: 1024,
            height: 768,
        });

        let frame = frame_loop.next_frame().unwrap();
        assert_eq!(
            frame.viewport,
            Some(Viewport {
                x: 0,
                y: 0,
                width: 1024,
                height: 768
            })
        );

        assert_eq!(frame_loop.next_frame().unwrap().viewport, None);
    }

    #[test]
    fn latest_resize_wins() {
        let mut frame_loop = FrameLoop::new(CLEAR, 6);

        frame_loop.handle_event(AppEvent::Resized {
            width: 640,
            height: 480,
        });
        frame_loop.handle_event(AppEvent::Resized {
            width: 0,
            height: 0,
        });
        frame_loop.handle_event(AppEvent::Resized {
            width: 320,
            height: 200,
        });

        let frame = frame_loop.next_frame().unwrap();
        assert_eq!(frame.viewport, Some(Viewport::covering(320, 200)));
    }

    #[test]
    fn alternate_geometry_draw_count() {
        let mut frame_loop = FrameLoop::new([0.0, 0.0, 0.0, 1.0], 3);

        assert_eq!(frame_loop.next_frame().unwrap().draw.count, 3);
    }
}
