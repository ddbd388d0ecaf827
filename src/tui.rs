use color_eyre::Result;
use ratatui::DefaultTerminal;

use crate::config::Config;
use crate::core::Session;
use crate::tui::events::{EventHandler, InputSource, handle_key_event};
use crate::tui::models::Event;
use crate::tui::renderer::{FrameData, render};

pub(crate) mod components;
pub(crate) mod events;
pub(crate) mod filter;
pub(crate) mod models;
pub(crate) mod renderer;
pub(crate) mod styles;

pub(crate) async fn run_tui(session: Session, config: &Config) -> Result<()> {
    let terminal = ratatui::init();
    let result = run(session, terminal, config).await;
    ratatui::restore();
    result
}

async fn run(session: Session, mut terminal: DefaultTerminal, config: &Config) -> Result<()> {
    let mut events = EventHandler::new(InputSource::detect());
    let mut tick = tokio::time::interval(config.refresh.to_std()?);

    loop {
        tokio::select! {
            _ = session.token.cancelled() => break,
            Some(event) = events.next() => {
                match event {
                    Event::Quit => {
                        session.token.cancel();
                        break;
                    }
                    Event::Key(key) => handle_key_event(&session.filter, &session.interval, key),
                    _ => {}
                }
            }
            _ = tick.tick() => {
                // 描画前にフィルタ状態と統計のスナップショットを取り、
                // フレーム整形中はどのロックも保持しない
                let filter = session.filter.current();
                let snapshot = session.stats.snapshot();
                let data = FrameData {
                    registry: &session.registry,
                    snapshot: &snapshot,
                    filter: &filter,
                    interval_secs: session.interval.current_secs(),
                    window: config.window,
                    page_size: config.page_size,
                };
                terminal.draw(|frame| render(frame, &data))?;
            }
        }
    }
    Ok(())
}
