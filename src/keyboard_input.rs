use crate::app::ShutdownReason;
use crate::error::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Keyboard driver standing in for the dashboard's action button
pub struct KeyboardInputHandler {
    presses: mpsc::UnboundedSender<()>,
    shutdown: mpsc::UnboundedSender<ShutdownReason>,
    cancellation_token: CancellationToken,
}

impl KeyboardInputHandler {
    /// Create a new keyboard input handler
    pub fn new(
        presses: mpsc::UnboundedSender<()>,
        shutdown: mpsc::UnboundedSender<ShutdownReason>,
    ) -> Self {
        Self {
            presses,
            shutdown,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Start listening for keyboard input
    pub async fn start(&self) -> Result<()> {
        info!("Starting keyboard input handler - press SPACE to connect/disconnect, q to quit");

        let presses = self.presses.clone();
        let shutdown = self.shutdown.clone();
        let cancellation_token = self.cancellation_token.clone();

        task::spawn_blocking(move || {
            if let Err(e) = enable_raw_mode() {
                error!("Failed to enable raw mode for keyboard input: {}", e);
                return;
            }

            debug!("Raw mode enabled - keyboard handler active");

            loop {
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard input handler stopping");
                    break;
                }

                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        if let Ok(Event::Key(key_event)) = event::read() {
                            if key_event.kind != KeyEventKind::Press {
                                continue;
                            }
                            match key_event.code {
                                KeyCode::Char(' ') | KeyCode::Enter => {
                                    info!("Action button pressed");
                                    if presses.send(()).is_err() {
                                        warn!("Dashboard is not listening for presses");
                                    }
                                }
                                KeyCode::Char('q') | KeyCode::Esc => {
                                    info!("Quit key pressed - requesting shutdown");
                                    let _ = shutdown.send(ShutdownReason::UserRequest);
                                    break;
                                }
                                other => debug!("Key pressed: {:?}", other),
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Error polling for keyboard events: {}", e);
                    }
                }
            }

            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            } else {
                debug!("Raw mode disabled");
            }
        });

        Ok(())
    }

    /// Stop the keyboard input handler
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping keyboard input handler");
        self.cancellation_token.cancel();

        // Give the polling loop a moment to leave raw mode itself
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = disable_raw_mode();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyboard_handler_creation() {
        let (presses, _press_rx) = mpsc::unbounded_channel();
        let (shutdown, _shutdown_rx) = mpsc::unbounded_channel();
        let handler = KeyboardInputHandler::new(presses, shutdown);

        assert!(!handler.cancellation_token.is_cancelled());
    }

    #[tokio::test]
    async fn test_keyboard_handler_stop() {
        let (presses, _press_rx) = mpsc::unbounded_channel();
        let (shutdown, _shutdown_rx) = mpsc::unbounded_channel();
        let handler = KeyboardInputHandler::new(presses, shutdown);

        handler.stop().await.unwrap();
        assert!(handler.cancellation_token.is_cancelled());
    }
}
