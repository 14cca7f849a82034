//! A framebuffer window and the main loop shared by all lessons.
//!
//! Each iteration clears the colour and depth buffers, snapshots the input state, hands both to the frame callback
//! and presents the colour buffer. The loop ends when the window is closed, Escape is pressed, or the callback
//! returns [`ControlFlow::Break`].

use crate::{
    buffer::Buffer2d,
    color::to_rgb_u32,
    texture::Texture,
};
use log::{debug, info};
use minifb::{KeyRepeat, MouseButton, MouseMode, WindowOptions};
use std::{
    ops::ControlFlow,
    time::{Duration, Instant},
};
use thiserror::Error;
use vek::{Rgb, Vec2};

pub use minifb::Key;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("failed to open window")]
    Open(#[source] minifb::Error),
    #[error("failed to present frame")]
    Present(#[source] minifb::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub title: String,
    pub size: [usize; 2],
    /// Colour the framebuffer is cleared to every frame, as `0xAARRGGBB`.
    pub clear_color: u32,
    pub target_fps: Option<usize>,
    pub resizable: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Lecture".to_string(),
            size: [800, 600],
            clear_color: 0xFFFF_FFFF,
            target_fps: Some(60),
            resizable: true,
        }
    }
}

impl Settings {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.size = [width, height];
        self
    }

    pub fn clear_color(mut self, color: Rgb<f32>) -> Self {
        self.clear_color = to_rgb_u32(color);
        self
    }

    pub fn target_fps(mut self, fps: Option<usize>) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }
}

/// The state of the keyboard and mouse as of the start of a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Input {
    /// Keys currently held down.
    pub keys_down: Vec<Key>,
    /// Keys that went down since the previous frame.
    pub keys_pressed: Vec<Key>,
    /// Cursor position in window pixels, if the cursor is over the window.
    pub mouse_pos: Option<Vec2<f32>>,
    /// Cursor movement since the previous frame, in window pixels.
    pub mouse_delta: Vec2<f32>,
    pub left_button: bool,
    pub right_button: bool,
    /// Scroll wheel movement since the previous frame.
    pub scroll: Vec2<f32>,
}

impl Input {
    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// `1.0` if only `pos` is held, `-1.0` if only `neg` is held, `0.0` otherwise.
    pub fn axis(&self, neg: Key, pos: Key) -> f32 {
        self.is_down(pos) as i32 as f32 - self.is_down(neg) as i32 as f32
    }

    fn advance(
        &mut self,
        keys_down: Vec<Key>,
        keys_pressed: Vec<Key>,
        mouse_pos: Option<Vec2<f32>>,
        [left_button, right_button]: [bool; 2],
        scroll: Option<Vec2<f32>>,
    ) {
        self.mouse_delta = match (self.mouse_pos, mouse_pos) {
            (Some(old), Some(new)) => new - old,
            _ => Vec2::zero(),
        };
        self.keys_down = keys_down;
        self.keys_pressed = keys_pressed;
        self.mouse_pos = mouse_pos;
        self.left_button = left_button;
        self.right_button = right_button;
        self.scroll = scroll.unwrap_or_default();
    }

    fn poll(&mut self, window: &minifb::Window) {
        self.advance(
            window.get_keys(),
            window.get_keys_pressed(KeyRepeat::No),
            window.get_mouse_pos(MouseMode::Pass).map(Vec2::from),
            [window.get_mouse_down(MouseButton::Left), window.get_mouse_down(MouseButton::Right)],
            window.get_scroll_wheel().map(Vec2::from),
        );
    }
}

/// Everything a lesson needs to draw one frame.
pub struct Frame<'a> {
    /// Time since the loop started.
    pub t: Duration,
    /// Time since the previous frame started.
    pub dt: Duration,
    /// Number of frames presented before this one.
    pub index: u64,
    pub color: &'a mut Buffer2d<u32>,
    pub depth: &'a mut Buffer2d<f32>,
    pub input: &'a Input,
}

impl<'a> Frame<'a> {
    pub fn size(&self) -> [usize; 2] {
        self.color.size()
    }

    /// Width over height of the framebuffer.
    pub fn aspect(&self) -> f32 {
        let [w, h] = self.size();
        w as f32 / h.max(1) as f32
    }
}

pub struct Window {
    inner: minifb::Window,
    settings: Settings,
}

impl Window {
    pub fn new(settings: Settings) -> Result<Self, WindowError> {
        let [width, height] = settings.size;
        let options = WindowOptions {
            resize: settings.resizable,
            ..WindowOptions::default()
        };
        let mut inner = minifb::Window::new(&settings.title, width, height, options).map_err(WindowError::Open)?;
        if let Some(fps) = settings.target_fps {
            inner.set_target_fps(fps);
        }
        info!("opened {}x{} window `{}`", width, height, settings.title);
        Ok(Self { inner, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Access the underlying minifb window.
    pub fn inner(&mut self) -> &mut minifb::Window {
        &mut self.inner
    }

    /// Run the main loop until the window is closed, Escape is pressed or `frame_fn` breaks.
    pub fn run<F>(&mut self, mut frame_fn: F) -> Result<(), WindowError>
    where
        F: FnMut(&mut Frame) -> ControlFlow<()>,
    {
        let clear = self.settings.clear_color;
        let mut color = Buffer2d::fill(self.settings.size, clear);
        let mut depth = Buffer2d::fill(self.settings.size, 1.0);
        let mut input = Input::default();

        let start = Instant::now();
        let mut last = start;
        let mut frames = 0u64;
        let mut busy = Duration::ZERO;
        let mut stats_start = start;

        while self.inner.is_open() && !self.inner.is_key_down(Key::Escape) {
            let (width, height) = self.inner.get_size();
            if width == 0 || height == 0 {
                // Minimised
                self.inner.update();
                continue;
            }
            if color.size() != [width, height] {
                debug!("resizing framebuffer to {}x{}", width, height);
            }
            color.resize([width, height], clear);
            depth.resize([width, height], 1.0);
            input.poll(&self.inner);

            let now = Instant::now();
            let mut frame = Frame {
                t: now - start,
                dt: now - last,
                index: frames,
                color: &mut color,
                depth: &mut depth,
                input: &input,
            };
            last = now;
            let flow = frame_fn(&mut frame);
            busy += now.elapsed();

            self.inner
                .update_with_buffer(color.raw(), width, height)
                .map_err(WindowError::Present)?;
            frames += 1;

            if flow.is_break() {
                break;
            }
            if frames % 60 == 0 {
                let frame_ms = busy.as_secs_f32() * 1000.0 / 60.0;
                let fps = 60.0 / stats_start.elapsed().as_secs_f32();
                self.inner
                    .set_title(&format!("{} | {:.2} ms/frame | {:.0} fps", self.settings.title, frame_ms, fps));
                busy = Duration::ZERO;
                stats_start = Instant::now();
            }
        }

        info!("closing `{}` after {} frames", self.settings.title, frames);
        Ok(())
    }
}
