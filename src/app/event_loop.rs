use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::app::{App, Message, Model, update};

/// Where the loop gets terminal events from.
pub trait EventSource {
    /// Wait up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input cannot be read.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Events read from the real terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll terminal events")? {
            Ok(Some(event::read().context("Failed to read terminal event")?))
        } else {
            Ok(None)
        }
    }
}

/// Where the loop draws the model.
pub trait Renderer {
    /// Current drawable size as `(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    fn area_size(&self) -> Result<(u16, u16)>;

    /// Draw one frame of `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    fn render_model(&mut self, model: &Model) -> Result<()>;
}

impl<B> Renderer for Terminal<B>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    fn area_size(&self) -> Result<(u16, u16)> {
        let size = self.size().context("Failed to query terminal size")?;
        Ok((size.width, size.height))
    }

    fn render_model(&mut self, model: &Model) -> Result<()> {
        self.draw(|frame| crate::ui::render(model, frame))
            .context("Failed to draw frame")?;
        Ok(())
    }
}

const IDLE_POLL: Duration = Duration::from_millis(250);

impl App {
    /// Run the viewer on the real terminal until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialised or the event
    /// loop fails to read input or draw.
    pub fn run(&self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: discview requires an interactive terminal")?;
        let mut model = Model::new(self.items.clone());

        let result = self.event_loop(&mut terminal, &mut CrosstermEvents, &mut model);

        ratatui::restore();
        result
    }

    /// Drive `model` from `events`, drawing through `renderer`.
    ///
    /// The renderer's current size is applied as the first resize so the
    /// viewer leaves the loading state before the first real event.
    ///
    /// # Errors
    ///
    /// Propagates failures from the event source or the renderer.
    pub fn event_loop<R: Renderer, E: EventSource>(
        &self,
        renderer: &mut R,
        events: &mut E,
        model: &mut Model,
    ) -> Result<()> {
        let (width, height) = renderer.area_size()?;
        *model = update(std::mem::take(model), Message::Resize(width, height));
        let mut needs_render = true;
        let mut frame_idx: u64 = 0;

        loop {
            if needs_render {
                frame_idx += 1;
                renderer.render_model(model)?;
                tracing::trace!(frame = frame_idx, cursor = ?model.cursor, "frame drawn");
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let Some(event) = events.poll_event(IDLE_POLL)? else {
                continue;
            };
            if let Some(msg) = self.handle_event(&event) {
                *model = update(std::mem::take(model), msg);
                needs_render = true;
            }

            // Coalesce key repeat bursts into a single render.
            let mut drained = 0_u32;
            while !model.should_quit
                && let Some(event) = events.poll_event(Duration::ZERO)?
            {
                if let Some(msg) = self.handle_event(&event) {
                    drained += 1;
                    *model = update(std::mem::take(model), msg);
                    needs_render = true;
                }
            }
            if drained > 0 {
                tracing::trace!(frame = frame_idx, drained, "event burst");
            }
        }
        Ok(())
    }
}
