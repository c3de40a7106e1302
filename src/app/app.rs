use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event;
use ratatui::prelude::*;

use lv_base::config::constants::{EVENT_POLL_MS, RENDER_THROTTLE_MS};
use lv_base::now_ms;

use crate::app::actions::{Action, apply_action};
use crate::app::events::handle_event;
use crate::app::host::Host;
use crate::infra::analyzer::AnalyzerEvent;
use crate::ui;

pub struct App {
    pub host: Host,
    rx: Receiver<AnalyzerEvent>,
    dirty: bool,
    /// Last render time for throttling
    last_render_ms: u64,
}

impl App {
    pub fn new(host: Host, rx: Receiver<AnalyzerEvent>) -> Self {
        Self { host, rx, dirty: true, last_render_ms: 0 }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        self.host.request_parameters();

        loop {
            let current_ms = now_ms();

            // === INPUT FIRST ===
            if event::poll(Duration::ZERO)? {
                let evt = event::read()?;
                let Some(action) = handle_event(&evt, &self.host) else {
                    tracing::info!("quit requested");
                    break;
                };
                if action != Action::None {
                    apply_action(&mut self.host, action);
                    self.dirty = true;
                }

                // Render immediately after input for instant feedback
                if self.dirty {
                    terminal.draw(|frame| ui::render(frame, &mut self.host))?;
                    self.dirty = false;
                    self.last_render_ms = current_ms;
                }
            }

            // === BACKGROUND PROCESSING ===
            self.process_analyzer_events();

            if self.dirty && current_ms.saturating_sub(self.last_render_ms) >= RENDER_THROTTLE_MS {
                terminal.draw(|frame| ui::render(frame, &mut self.host))?;
                self.dirty = false;
                self.last_render_ms = current_ms;
            }

            let _ = event::poll(Duration::from_millis(EVENT_POLL_MS))?;
        }

        Ok(())
    }

    fn process_analyzer_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.host.handle_analyzer_event(event);
            self.dirty = true;
        }
    }
}
